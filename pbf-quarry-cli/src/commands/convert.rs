use std::path::PathBuf;

use clap::Args;
use pbf_quarry::models::ElementCount;
use pbf_quarry::parquet::writer::{prepare_output_path, write_header_json, WriterConfig};
use pbf_quarry::pbf::codecs::blob::BlobReader;
use pbf_quarry::pipeline::{run_pipeline, ElementSink, PipelineOptions};

use super::make_spinner;

#[derive(Args)]
pub struct ConvertCommand {
    /// path to the OSM PBF file
    #[clap(long, value_parser)]
    pbf_filename: String,

    /// output directory for the element tables
    #[clap(long, value_parser)]
    output_path: PathBuf,

    /// maximum output file size in MB
    #[clap(long, value_parser, default_value_t = 128)]
    max_file_size_mb: u64,

    /// number of decode workers
    #[clap(long, value_parser, default_value_t = 8)]
    workers: usize,
}

impl ConvertCommand {
    pub fn run(self) -> anyhow::Result<()> {
        blue!("Converting ");
        dark_yellow!("{}", self.pbf_filename);
        blue!(" to ");
        dark_yellow!("{}", self.output_path.display());
        println!(" ...");

        let config = WriterConfig {
            max_file_size: Some(self.max_file_size_mb * 1024 * 1024),
            ..Default::default()
        };
        prepare_output_path(&self.output_path)?;

        let reader = BlobReader::from_path(&self.pbf_filename)?;
        let bar = make_spinner("decoding blocks");
        let root = self.output_path.clone();
        let outputs = run_pipeline(
            reader.inspect(|_| bar.inc(1)),
            PipelineOptions {
                workers: self.workers,
                ..Default::default()
            },
            |_worker| ElementSink::new(&root, config.clone()),
            |header| write_header_json(&root, header.payload()),
        )?;
        bar.finish();

        let mut total = ElementCount::default();
        for count in outputs {
            total += count;
        }
        println!("written: {}", total);
        Ok(())
    }
}
