use crate::errors::{Error, Result};
use crate::pbf::proto::osmformat::PrimitiveBlock;

/// Per-block decoding context: the string table plus the fixed-point
/// scaling parameters. Built once per primitive block so the UTF-8
/// validation of the table is amortized over every record in the block.
#[derive(Debug)]
pub struct FieldCodec {
    granularity: i64,
    lat_offset: i64,
    lon_offset: i64,
    date_granularity: i64,
    string_table: Vec<String>,
}

impl FieldCodec {
    pub fn new_with_block(block: &PrimitiveBlock) -> Result<Self> {
        let bytes_array = block.get_stringtable().get_s();
        let mut string_table = Vec::with_capacity(bytes_array.len());
        for (index, bytes) in bytes_array.iter().enumerate() {
            let entry = String::from_utf8(bytes.clone()).map_err(|err| {
                Error::decode(format!("string table entry {} is not UTF-8: {}", index, err))
            })?;
            string_table.push(entry);
        }
        Ok(Self {
            granularity: block.get_granularity() as i64,
            lat_offset: block.get_lat_offset(),
            lon_offset: block.get_lon_offset(),
            date_granularity: block.get_date_granularity() as i64,
            string_table,
        })
    }

    /// Converts an accumulated raw latitude into degrees.
    pub fn decode_latitude(&self, raw_latitude: i64) -> f64 {
        1e-9 * (self.lat_offset + self.granularity * raw_latitude) as f64
    }

    /// Converts an accumulated raw longitude into degrees.
    pub fn decode_longitude(&self, raw_longitude: i64) -> f64 {
        1e-9 * (self.lon_offset + self.granularity * raw_longitude) as f64
    }

    /// Converts a raw timestamp into epoch milliseconds.
    pub fn decode_timestamp(&self, raw_timestamp: i64) -> i64 {
        raw_timestamp * self.date_granularity
    }

    pub fn decode_string(&self, string_id: usize) -> Result<&str> {
        self.string_table
            .get(string_id)
            .map(String::as_str)
            .ok_or_else(|| {
                Error::decode(format!(
                    "string table index {} out of range ({} entries)",
                    string_id,
                    self.string_table.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::proto::osmformat::StringTable;

    fn block_with_table(entries: &[&str]) -> PrimitiveBlock {
        let mut table = StringTable::new();
        for entry in entries {
            table.mut_s().push(entry.as_bytes().to_vec());
        }
        let mut block = PrimitiveBlock::new();
        block.set_stringtable(table);
        block
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn scales_coordinates_with_default_granularity() {
        let codec = FieldCodec::new_with_block(&block_with_table(&[])).unwrap();
        assert_close(codec.decode_latitude(1_234_567_890), 123.456789);
        assert_close(codec.decode_longitude(-1_234_567_890), -123.456789);
    }

    #[test]
    fn applies_offsets_before_scaling() {
        let mut block = block_with_table(&[]);
        block.set_granularity(1000);
        block.set_lat_offset(500);
        block.set_lon_offset(-500);
        let codec = FieldCodec::new_with_block(&block).unwrap();
        assert_close(codec.decode_latitude(1_000_000), 1.0000005);
        assert_close(codec.decode_longitude(1_000_000), 0.9999995);
    }

    #[test]
    fn scales_timestamps_with_date_granularity() {
        let mut block = block_with_table(&[]);
        block.set_date_granularity(2000);
        let codec = FieldCodec::new_with_block(&block).unwrap();
        assert_eq!(codec.decode_timestamp(1_000), 2_000_000);

        let default_codec = FieldCodec::new_with_block(&block_with_table(&[])).unwrap();
        assert_eq!(default_codec.decode_timestamp(1_000), 1_000_000);
    }

    #[test]
    fn looks_up_strings_by_index() {
        let codec = FieldCodec::new_with_block(&block_with_table(&["", "highway"])).unwrap();
        assert_eq!(codec.decode_string(1).unwrap(), "highway");
        assert!(codec.decode_string(2).is_err());
    }

    #[test]
    fn rejects_invalid_utf8_table_entries() {
        let mut table = StringTable::new();
        table.mut_s().push(vec![0xff, 0xfe]);
        let mut block = PrimitiveBlock::new();
        block.set_stringtable(table);
        let err = FieldCodec::new_with_block(&block).unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    }
}
