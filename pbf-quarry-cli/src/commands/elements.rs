use std::path::PathBuf;

use clap::Args;
use pbf_quarry::parquet::staging::BlobRowReader;
use pbf_quarry::parquet::writer::{prepare_output_path, WriterConfig};
use pbf_quarry::pipeline::partition::process_partition;

#[derive(Args)]
pub struct ElementsCommand {
    /// directory holding the staged blob table
    #[clap(long, value_parser)]
    input_path: PathBuf,

    /// output directory for the element tables
    #[clap(long, value_parser)]
    output_path: PathBuf,

    /// maximum output file size in MB
    #[clap(long, value_parser, default_value_t = 128)]
    max_file_size_mb: u64,
}

impl ElementsCommand {
    pub fn run(self) -> anyhow::Result<()> {
        blue!("Converting staged blobs in ");
        dark_yellow!("{}", self.input_path.display());
        blue!(" to ");
        dark_yellow!("{}", self.output_path.display());
        println!(" ...");

        let config = WriterConfig {
            max_file_size: Some(self.max_file_size_mb * 1024 * 1024),
            ..Default::default()
        };
        prepare_output_path(&self.output_path)?;

        let rows = BlobRowReader::open_dir(&self.input_path)?;
        let counts = process_partition(rows, &self.output_path, config)?;

        println!("written: {}", counts);
        Ok(())
    }
}
