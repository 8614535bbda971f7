use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::models::ElementCount;
use crate::parquet::records::{
    create_batch_for_nodes, create_batch_for_relations, create_batch_for_ways,
};
use crate::parquet::schemas::{get_node_schema, get_relation_schema, get_way_schema};
use crate::pbf::codecs::blob::decode_block;
use crate::pbf::codecs::block_decorators::{HeaderReader, PrimitiveReader};
use crate::pbf::proto::osmformat::{HeaderBlock, PrimitiveBlock};

/// Rotation thresholds for one output stream. Absent limits disable the
/// corresponding trigger.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Parquet row group size inside each file.
    pub max_rows_per_group: Option<usize>,
    /// Rotate once this many rows have been written to the current file.
    pub max_rows_per_file: Option<u64>,
    /// Rotate once the current file reaches this many bytes on disk.
    pub max_file_size: Option<u64>,
}

// Probing the on-disk size forces a row-group flush, so it only happens on
// every Nth batch.
const SIZE_PROBE_INTERVAL: u64 = 10;

struct OpenFile {
    path: PathBuf,
    writer: ArrowWriter<File>,
    rows_written: u64,
    batches_written: u64,
}

/// Appends record batches to a sequence of Parquet files, rotating to a new
/// file whenever a configured threshold is crossed.
///
/// Each output stream goes Unopened -> Open -> Closed: the first write after
/// construction or a rotation lazily opens a fresh file named with the
/// writer's run id and a monotonically increasing index.
pub struct ParquetBatchWriter {
    base_path: PathBuf,
    prefix: String,
    schema: Arc<Schema>,
    config: WriterConfig,
    run_id: String,
    file_index: u32,
    open: Option<OpenFile>,
}

impl ParquetBatchWriter {
    pub fn new(
        base_path: impl Into<PathBuf>,
        prefix: &str,
        schema: Arc<Schema>,
        config: WriterConfig,
    ) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|err| {
            Error::write(format!("creating {}: {}", base_path.display(), err))
        })?;
        Ok(Self {
            base_path,
            prefix: prefix.to_owned(),
            schema,
            config,
            run_id: Uuid::new_v4().simple().to_string(),
            file_index: 0,
            open: None,
        })
    }

    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        if batch.num_rows() == 0 {
            return Ok(());
        }

        if self.open.is_none() {
            self.open_next_file()?;
        }
        let open = self.open.as_mut().expect("writer opened above");
        open.writer.write(batch).map_err(|err| {
            Error::write(format!("appending to {}: {}", open.path.display(), err))
        })?;
        open.rows_written += batch.num_rows() as u64;
        open.batches_written += 1;

        if self.should_rotate()? {
            self.close()?;
        }
        Ok(())
    }

    fn open_next_file(&mut self) -> Result<()> {
        self.file_index += 1;
        let filename = format!(
            "{}_{}_{:05}.parquet",
            self.prefix, self.run_id, self.file_index
        );
        let path = self.base_path.join(filename);
        let file = File::create(&path)
            .map_err(|err| Error::write(format!("creating {}: {}", path.display(), err)))?;

        let mut props = WriterProperties::builder();
        if let Some(max_rows_per_group) = self.config.max_rows_per_group {
            props = props.set_max_row_group_size(max_rows_per_group);
        }
        let writer = ArrowWriter::try_new(file, self.schema.clone(), Some(props.build()))
            .map_err(|err| Error::write(format!("opening {}: {}", path.display(), err)))?;

        self.open = Some(OpenFile {
            path,
            writer,
            rows_written: 0,
            batches_written: 0,
        });
        Ok(())
    }

    fn should_rotate(&mut self) -> Result<bool> {
        let Some(open) = self.open.as_mut() else {
            return Ok(false);
        };

        if let Some(max_rows) = self.config.max_rows_per_file {
            if open.rows_written >= max_rows {
                log::debug!(
                    "rotating {} after {} rows",
                    open.path.display(),
                    open.rows_written
                );
                return Ok(true);
            }
        }

        if let Some(max_file_size) = self.config.max_file_size {
            if open.batches_written % SIZE_PROBE_INTERVAL == 0 {
                open.writer.flush().map_err(|err| {
                    Error::write(format!("flushing {}: {}", open.path.display(), err))
                })?;
                let size = fs::metadata(&open.path)
                    .map_err(|err| {
                        Error::write(format!("probing {}: {}", open.path.display(), err))
                    })?
                    .len();
                if size >= max_file_size {
                    log::debug!("rotating {} at {} bytes", open.path.display(), size);
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Finalizes the open file, if any. Idempotent; the next write opens a
    /// fresh file.
    pub fn close(&mut self) -> Result<()> {
        if let Some(open) = self.open.take() {
            open.writer.close().map_err(|err| {
                Error::write(format!("closing {}: {}", open.path.display(), err))
            })?;
        }
        Ok(())
    }
}

impl Drop for ParquetBatchWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::error!("closing parquet writer on drop: {}", err);
        }
    }
}

/// Recreates `path` as an empty directory.
pub fn clear_directory(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .map_err(|err| Error::write(format!("clearing {}: {}", path.display(), err)))?;
    }
    fs::create_dir_all(path)
        .map_err(|err| Error::write(format!("creating {}: {}", path.display(), err)))?;
    Ok(())
}

/// Prepares the element output layout: an empty root with `nodes/`, `ways/`
/// and `relations/` subdirectories.
pub fn prepare_output_path(root: &Path) -> Result<()> {
    clear_directory(root)?;
    for subdir in ["nodes", "ways", "relations"] {
        fs::create_dir_all(root.join(subdir)).map_err(|err| {
            Error::write(format!("creating {}: {}", root.join(subdir).display(), err))
        })?;
    }
    Ok(())
}

/// Decodes a header frame payload and writes it as a `header.json` sidecar
/// under `root`.
pub fn write_header_json(root: &Path, payload: &[u8]) -> Result<()> {
    let header: HeaderBlock = decode_block(payload)?;
    let summary = HeaderReader::new(header).summary();
    let path = root.join("header.json");
    let file = File::create(&path)
        .map_err(|err| Error::write(format!("creating {}: {}", path.display(), err)))?;
    serde_json::to_writer(file, &summary)
        .map_err(|err| Error::write(format!("writing {}: {}", path.display(), err)))
}

/// The three per-kind element writers of one output root.
///
/// Owns its run lifecycle: writers open lazily on first use and `close`
/// runs on every exit path (explicitly, or through `Drop`).
pub struct ElementWriter {
    root: PathBuf,
    nodes: ParquetBatchWriter,
    ways: ParquetBatchWriter,
    relations: ParquetBatchWriter,
}

impl ElementWriter {
    pub fn new(root: impl Into<PathBuf>, config: WriterConfig) -> Result<Self> {
        let root = root.into();
        Ok(Self {
            nodes: ParquetBatchWriter::new(
                root.join("nodes"),
                "nodes",
                get_node_schema(),
                config.clone(),
            )?,
            ways: ParquetBatchWriter::new(
                root.join("ways"),
                "ways",
                get_way_schema(),
                config.clone(),
            )?,
            relations: ParquetBatchWriter::new(
                root.join("relations"),
                "relations",
                get_relation_schema(),
                config,
            )?,
            root,
        })
    }

    pub fn write_header(&self, payload: &[u8]) -> Result<()> {
        write_header_json(&self.root, payload)
    }

    /// Decodes one primitive-block payload and appends its elements to the
    /// per-kind writers. Returns how many elements each table received.
    pub fn write_elements(&mut self, payload: &[u8]) -> Result<ElementCount> {
        let block: PrimitiveBlock = decode_block(payload)?;
        let reader = PrimitiveReader::new(block)?;
        let (nodes, ways, relations) = reader.get_all_elements()?;

        if let Some(batch) = create_batch_for_nodes(&nodes)? {
            self.nodes.write(&batch)?;
        }
        if let Some(batch) = create_batch_for_ways(&ways)? {
            self.ways.write(&batch)?;
        }
        if let Some(batch) = create_batch_for_relations(&relations)? {
            self.relations.write(&batch)?;
        }

        Ok(ElementCount {
            nodes: nodes.len() as u64,
            ways: ways.len() as u64,
            relations: relations.len() as u64,
        })
    }

    /// Closes all three streams; the first failure is reported after every
    /// stream has had its chance to close.
    pub fn close(&mut self) -> Result<()> {
        let results = [
            self.nodes.close(),
            self.ways.close(),
            self.relations.close(),
        ];
        for result in results {
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};

    use super::*;

    fn test_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]))
    }

    fn batch_of(rows: usize) -> RecordBatch {
        let values: Vec<i64> = (0..rows as i64).collect();
        RecordBatch::try_new(
            test_schema(),
            vec![Arc::new(Int64Array::from(values)) as _],
        )
        .unwrap()
    }

    fn parquet_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn rotates_on_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            max_rows_per_file: Some(1000),
            ..Default::default()
        };
        let mut writer =
            ParquetBatchWriter::new(dir.path(), "nodes", test_schema(), config).unwrap();

        for _ in 0..4 {
            writer.write(&batch_of(400)).unwrap();
        }
        writer.close().unwrap();

        // 400 + 400 + 400 crosses the threshold after the third batch, so
        // the fourth lands in a second file.
        assert_eq!(parquet_files(dir.path()).len(), 2);
    }

    #[test]
    fn no_rotation_without_limits() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ParquetBatchWriter::new(
            dir.path(),
            "nodes",
            test_schema(),
            WriterConfig::default(),
        )
        .unwrap();

        for _ in 0..12 {
            writer.write(&batch_of(500)).unwrap();
        }
        writer.close().unwrap();

        assert_eq!(parquet_files(dir.path()).len(), 1);
    }

    #[test]
    fn empty_batches_do_not_open_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ParquetBatchWriter::new(
            dir.path(),
            "nodes",
            test_schema(),
            WriterConfig::default(),
        )
        .unwrap();

        writer.write(&batch_of(0)).unwrap();
        writer.close().unwrap();

        assert!(parquet_files(dir.path()).is_empty());
    }

    #[test]
    fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ParquetBatchWriter::new(
            dir.path(),
            "nodes",
            test_schema(),
            WriterConfig::default(),
        )
        .unwrap();

        writer.write(&batch_of(5)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();

        assert_eq!(parquet_files(dir.path()).len(), 1);
    }

    #[test]
    fn size_probe_rotates_every_tenth_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            max_file_size: Some(1),
            ..Default::default()
        };
        let mut writer =
            ParquetBatchWriter::new(dir.path(), "nodes", test_schema(), config).unwrap();

        // The 1-byte limit is crossed immediately, but the probe only runs
        // on every tenth batch.
        for _ in 0..20 {
            writer.write(&batch_of(10)).unwrap();
        }
        writer.close().unwrap();

        assert_eq!(parquet_files(dir.path()).len(), 2);
    }

    #[test]
    fn filenames_carry_run_id_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = WriterConfig {
            max_rows_per_file: Some(1),
            ..Default::default()
        };
        let mut writer =
            ParquetBatchWriter::new(dir.path(), "ways", test_schema(), config).unwrap();
        writer.write(&batch_of(1)).unwrap();
        writer.write(&batch_of(1)).unwrap();
        writer.close().unwrap();

        let files = parquet_files(dir.path());
        assert_eq!(files.len(), 2);
        let first = files[0].file_name().unwrap().to_str().unwrap();
        let second = files[1].file_name().unwrap().to_str().unwrap();
        assert!(first.starts_with("ways_") && first.ends_with("_00001.parquet"));
        assert!(second.ends_with("_00002.parquet"));
        // Same run id in both names.
        assert_eq!(
            first.trim_end_matches("_00001.parquet"),
            second.trim_end_matches("_00002.parquet")
        );
    }

    #[test]
    fn prepare_output_path_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        fs::create_dir_all(root.join("stale")).unwrap();
        fs::write(root.join("stale/file"), b"x").unwrap();

        prepare_output_path(&root).unwrap();
        assert!(root.join("nodes").is_dir());
        assert!(root.join("ways").is_dir());
        assert!(root.join("relations").is_dir());
        assert!(!root.join("stale").exists());
    }
}
