use std::path::Path;

use crate::errors::Result;
use crate::models::ElementCount;
use crate::parquet::staging::BlobRow;
use crate::parquet::writer::{ElementWriter, WriterConfig};
use crate::pbf::codecs::blob::{OSM_DATA_TYPE, OSM_HEADER_TYPE};

/// Processes one partition of staged blob rows into element tables.
///
/// This is the entry point the outer compute layer calls once per
/// partition: the writer opens at partition start, every row is routed by
/// its declared type, and the writer is closed before any error surfaces,
/// so a failing partition never leaves dangling output streams behind.
pub fn process_partition<I>(rows: I, root: &Path, config: WriterConfig) -> Result<ElementCount>
where
    I: IntoIterator<Item = Result<BlobRow>>,
{
    let mut writer = ElementWriter::new(root, config)?;
    let mut counts = ElementCount::default();

    let mut outcome = Ok(());
    for row in rows {
        let result = match row {
            Ok(row) => match row.blob_type.as_str() {
                OSM_HEADER_TYPE => writer.write_header(&row.blob_data),
                OSM_DATA_TYPE => writer.write_elements(&row.blob_data).map(|written| {
                    counts += written;
                }),
                other => {
                    log::warn!("skipping row with unknown blob type {:?}", other);
                    Ok(())
                }
            },
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            outcome = Err(err);
            break;
        }
    }

    let closed = writer.close();
    outcome?;
    closed?;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::pbf::proto::fileformat::Blob;
    use crate::pbf::proto::osmformat::{
        HeaderBlock, PrimitiveBlock, PrimitiveGroup, StringTable,
    };

    fn blob_payload(block_bytes: Vec<u8>) -> Vec<u8> {
        let mut blob = Blob::new();
        blob.set_raw_size(block_bytes.len() as i32);
        blob.set_raw(block_bytes);
        protobuf::Message::write_to_bytes(&blob).unwrap()
    }

    fn header_row() -> BlobRow {
        let mut header = HeaderBlock::new();
        header.set_writingprogram("test".into());
        BlobRow {
            blob_type: OSM_HEADER_TYPE.to_owned(),
            header_data: Vec::new(),
            blob_data: blob_payload(protobuf::Message::write_to_bytes(&header).unwrap()),
        }
    }

    fn data_row(node_count: usize) -> BlobRow {
        let mut table = StringTable::new();
        table.mut_s().push(Vec::new());
        let mut block = PrimitiveBlock::new();
        block.set_stringtable(table);
        let mut group = PrimitiveGroup::new();
        let mut dense = crate::pbf::proto::osmformat::DenseNodes::new();
        for i in 0..node_count {
            dense.mut_id().push(i as i64 + 1);
            dense.mut_lat().push(1);
            dense.mut_lon().push(1);
        }
        group.set_dense(dense);
        block.mut_primitivegroup().push(group);
        BlobRow {
            blob_type: OSM_DATA_TYPE.to_owned(),
            header_data: Vec::new(),
            blob_data: blob_payload(protobuf::Message::write_to_bytes(&block).unwrap()),
        }
    }

    #[test]
    fn partition_writes_header_and_elements() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![Ok(header_row()), Ok(data_row(3)), Ok(data_row(2))];

        let counts = process_partition(rows, dir.path(), WriterConfig::default()).unwrap();
        assert_eq!(counts.nodes, 5);

        assert!(dir.path().join("header.json").exists());
        let header_json = fs::read_to_string(dir.path().join("header.json")).unwrap();
        assert!(header_json.contains("\"writingprogram\":\"test\""));

        let node_files: Vec<_> = fs::read_dir(dir.path().join("nodes"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(node_files.len(), 1);
    }

    #[test]
    fn corrupt_row_fails_after_closing_writers() {
        let dir = tempfile::tempdir().unwrap();
        // A blob with no compression variant set.
        let corrupt = BlobRow {
            blob_type: OSM_DATA_TYPE.to_owned(),
            header_data: Vec::new(),
            blob_data: protobuf::Message::write_to_bytes(&Blob::new()).unwrap(),
        };
        let rows = vec![Ok(data_row(1)), Ok(corrupt), Ok(data_row(1))];

        let err = process_partition(rows, dir.path(), WriterConfig::default()).unwrap_err();
        assert!(matches!(err, crate::errors::Error::Codec(_)), "got {:?}", err);

        // The file written before the failure was still finalized.
        let node_files: Vec<_> = fs::read_dir(dir.path().join("nodes"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(node_files.len(), 1);
    }
}
