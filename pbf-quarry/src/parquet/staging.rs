use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray, BinaryBuilder, RecordBatch, StringArray, StringBuilder};
use parquet::arrow::arrow_reader::ParquetRecordBatchReader;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::errors::{Error, Result};
use crate::parquet::schemas::get_blob_schema;
use crate::parquet::writer::{ParquetBatchWriter, WriterConfig};
use crate::pbf::codecs::blob::RawBlob;

/// Frames per staged record batch.
pub const BLOB_BATCH_SIZE: usize = 16;

const BLOB_FILE_PREFIX: &str = "osm_pbf_blobs_part";

/// One PBF frame as a row of the staging table: the declared type, the raw
/// header bytes, and the still-compressed blob payload.
#[derive(Debug, Clone)]
pub struct BlobRow {
    pub blob_type: String,
    pub header_data: Vec<u8>,
    pub blob_data: Vec<u8>,
}

impl From<RawBlob> for BlobRow {
    fn from(blob: RawBlob) -> Self {
        let blob_type = blob.blob_type().to_owned();
        let (header_data, blob_data) = blob.into_parts();
        Self {
            blob_type,
            header_data,
            blob_data,
        }
    }
}

fn create_batch_for_blobs(rows: &[BlobRow]) -> Result<Option<RecordBatch>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut blob_type = StringBuilder::new();
    let mut header_data = BinaryBuilder::new();
    let mut blob_data = BinaryBuilder::new();
    for row in rows {
        blob_type.append_value(&row.blob_type);
        header_data.append_value(&row.header_data);
        blob_data.append_value(&row.blob_data);
    }
    let columns = vec![
        Arc::new(blob_type.finish()) as ArrayRef,
        Arc::new(header_data.finish()) as ArrayRef,
        Arc::new(blob_data.finish()) as ArrayRef,
    ];
    RecordBatch::try_new(get_blob_schema(), columns)
        .map(Some)
        .map_err(|err| Error::write(format!("assembling blob batch: {}", err)))
}

/// Accumulates frames into record batches and feeds them to a rotating
/// Parquet writer. The staged table is the hand-off point to whatever
/// compute layer processes partitions of it.
pub struct BlobStager {
    writer: ParquetBatchWriter,
    pending: Vec<BlobRow>,
    batch_size: usize,
    frames: u64,
}

impl BlobStager {
    pub fn new(output_path: impl Into<PathBuf>, config: WriterConfig) -> Result<Self> {
        Ok(Self {
            writer: ParquetBatchWriter::new(
                output_path,
                BLOB_FILE_PREFIX,
                get_blob_schema(),
                config,
            )?,
            pending: Vec::with_capacity(BLOB_BATCH_SIZE),
            batch_size: BLOB_BATCH_SIZE,
            frames: 0,
        })
    }

    pub fn push(&mut self, row: BlobRow) -> Result<()> {
        self.pending.push(row);
        self.frames += 1;
        if self.pending.len() >= self.batch_size {
            self.flush_pending()?;
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(batch) = create_batch_for_blobs(&self.pending)? {
            self.writer.write(&batch)?;
        }
        self.pending.clear();
        Ok(())
    }

    /// Writes any buffered rows and closes the writer. Returns the number of
    /// frames staged.
    pub fn finish(mut self) -> Result<u64> {
        self.flush_pending()?;
        self.writer.close()?;
        Ok(self.frames)
    }
}

/// Streams `BlobRow`s back out of a directory of staged Parquet files, in
/// filename order.
pub struct BlobRowReader {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<ParquetRecordBatchReader>,
    rows: std::vec::IntoIter<BlobRow>,
}

impl BlobRowReader {
    pub fn open_dir(path: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|err| Error::write(format!("listing {}: {}", path.display(), err)))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "parquet"))
            .collect();
        files.sort();
        Ok(Self {
            files: files.into_iter(),
            current: None,
            rows: Vec::new().into_iter(),
        })
    }

    fn open_next_file(&mut self) -> Result<bool> {
        let Some(path) = self.files.next() else {
            return Ok(false);
        };
        let file = File::open(&path)
            .map_err(|err| Error::write(format!("opening {}: {}", path.display(), err)))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .and_then(|builder| builder.build())
            .map_err(|err| Error::write(format!("reading {}: {}", path.display(), err)))?;
        self.current = Some(reader);
        Ok(true)
    }

    fn rows_from_batch(batch: &RecordBatch) -> Result<Vec<BlobRow>> {
        let type_mismatch = || Error::write("staged blob table has unexpected column types");
        let blob_types = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(type_mismatch)?;
        let header_data = batch
            .column(1)
            .as_any()
            .downcast_ref::<BinaryArray>()
            .ok_or_else(type_mismatch)?;
        let blob_data = batch
            .column(2)
            .as_any()
            .downcast_ref::<BinaryArray>()
            .ok_or_else(type_mismatch)?;

        let mut rows = Vec::with_capacity(batch.num_rows());
        for i in 0..batch.num_rows() {
            rows.push(BlobRow {
                blob_type: blob_types.value(i).to_owned(),
                header_data: header_data.value(i).to_vec(),
                blob_data: blob_data.value(i).to_vec(),
            });
        }
        Ok(rows)
    }

    fn next_row(&mut self) -> Result<Option<BlobRow>> {
        loop {
            if let Some(row) = self.rows.next() {
                return Ok(Some(row));
            }
            let next_batch = match self.current.as_mut() {
                Some(reader) => reader.next(),
                None => None,
            };
            match next_batch {
                Some(batch) => {
                    let batch = batch
                        .map_err(|err| Error::write(format!("reading staged blobs: {}", err)))?;
                    self.rows = Self::rows_from_batch(&batch)?.into_iter();
                }
                None => {
                    if !self.open_next_file()? {
                        return Ok(None);
                    }
                }
            }
        }
    }
}

impl Iterator for BlobRowReader {
    type Item = Result<BlobRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::codecs::blob::{OSM_DATA_TYPE, OSM_HEADER_TYPE};

    fn row(blob_type: &str, payload: &[u8]) -> BlobRow {
        BlobRow {
            blob_type: blob_type.to_owned(),
            header_data: vec![1, 2, 3],
            blob_data: payload.to_vec(),
        }
    }

    #[test]
    fn staged_rows_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut stager = BlobStager::new(dir.path(), WriterConfig::default()).unwrap();

        stager.push(row(OSM_HEADER_TYPE, b"header")).unwrap();
        // Enough rows to span multiple record batches.
        for i in 0..40u8 {
            stager.push(row(OSM_DATA_TYPE, &[i])).unwrap();
        }
        let frames = stager.finish().unwrap();
        assert_eq!(frames, 41);

        let rows: Vec<BlobRow> = BlobRowReader::open_dir(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 41);
        assert_eq!(rows[0].blob_type, OSM_HEADER_TYPE);
        assert_eq!(rows[0].blob_data, b"header");
        assert_eq!(rows[40].blob_data, vec![39]);
        assert!(rows.iter().all(|r| r.header_data == vec![1, 2, 3]));
    }

    #[test]
    fn staging_respects_row_count_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            max_rows_per_file: Some(32),
            ..Default::default()
        };
        let mut stager = BlobStager::new(dir.path(), config).unwrap();
        for i in 0..64u8 {
            stager.push(row(OSM_DATA_TYPE, &[i])).unwrap();
        }
        stager.finish().unwrap();

        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "parquet"))
            .collect();
        assert_eq!(files.len(), 2);
    }
}
