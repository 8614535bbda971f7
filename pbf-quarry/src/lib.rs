//! This crate converts OpenStreetMap PBF extracts into Parquet element
//! tables.
//!
//! The decode path runs in stages: a framing reader splits the stream into
//! length-prefixed blobs, a codec dispatcher decompresses each blob (raw,
//! zlib or zstd), a per-block decoder turns the delta- and
//! dictionary-compressed records into typed elements, and rotating batch
//! writers emit one Parquet file sequence per element kind. A bounded
//! worker-pool pipeline runs those stages in parallel over one input
//! stream.
//!
//! # Modules
//!
//! * `models` - Decoded element types (nodes, ways, relations).
//! * `pbf` - Framing, codecs and block decoding for the PBF format.
//! * `parquet` - Schemas, batch builders and the rotating writers.
//! * `pipeline` - The worker-pool pipeline and the partition processor.
//!
//! # Example
//!
//! Decode a PBF file sequentially:
//!
//! ```no_run
//! use pbf_quarry::models::Element;
//! use pbf_quarry::pbf::readers::PbfReader;
//!
//! # fn main() -> pbf_quarry::Result<()> {
//! let mut reader = PbfReader::from_path("path/to/osm.pbf")?;
//! let mut nodes = 0u64;
//! reader.read(|_header, element| {
//!     if let Some(Element::Node(_)) = element {
//!         nodes += 1;
//!     }
//! })?;
//! println!("{} nodes", nodes);
//! # Ok(())
//! # }
//! ```
//!
//! Convert in parallel, one writer per worker:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use pbf_quarry::parquet::writer::{prepare_output_path, WriterConfig};
//! use pbf_quarry::pbf::codecs::blob::BlobReader;
//! use pbf_quarry::pipeline::{run_pipeline, ElementSink, PipelineOptions};
//!
//! # fn main() -> pbf_quarry::Result<()> {
//! let out = Path::new("/tmp/osm-tables");
//! prepare_output_path(out)?;
//! let reader = BlobReader::from_path("path/to/osm.pbf")?;
//! run_pipeline(
//!     reader,
//!     PipelineOptions::default(),
//!     |_worker| ElementSink::new(out, WriterConfig::default()),
//!     |_header| Ok(()),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod models;
pub mod parquet;
pub mod pbf;
pub mod pipeline;

pub use errors::{Error, Result};
