use std::path::PathBuf;

use clap::Args;
use pbf_quarry::parquet::staging::BlobStager;
use pbf_quarry::parquet::writer::{clear_directory, WriterConfig};
use pbf_quarry::pbf::codecs::blob::BlobReader;

use super::make_spinner;

#[derive(Args)]
pub struct BlobsCommand {
    /// path to the OSM PBF file
    #[clap(long, value_parser)]
    pbf_filename: String,

    /// output directory for the staged blob table
    #[clap(long, value_parser)]
    output_path: PathBuf,

    /// maximum output file size in MB
    #[clap(long, value_parser, default_value_t = 128)]
    max_file_size_mb: u64,
}

impl BlobsCommand {
    pub fn run(self) -> anyhow::Result<()> {
        blue!("Staging ");
        dark_yellow!("{}", self.pbf_filename);
        blue!(" to ");
        dark_yellow!("{}", self.output_path.display());
        println!(" ...");

        let config = WriterConfig {
            max_rows_per_group: Some(16),
            max_file_size: Some(self.max_file_size_mb * 1024 * 1024),
            ..Default::default()
        };
        clear_directory(&self.output_path)?;

        let mut reader = BlobReader::from_path(&self.pbf_filename)?;
        let mut stager = BlobStager::new(&self.output_path, config)?;
        let bar = make_spinner("reading blobs");
        while let Some(blob) = reader.next_blob()? {
            bar.inc(1);
            stager.push(blob.into())?;
        }
        let frames = stager.finish()?;
        bar.finish();

        println!("staged {} frames", frames);
        Ok(())
    }
}
