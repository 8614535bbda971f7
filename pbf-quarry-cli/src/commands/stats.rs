use clap::Args;
use pbf_quarry::models::ElementCount;
use pbf_quarry::pbf::codecs::blob::BlobReader;
use pbf_quarry::pipeline::{run_pipeline, PipelineOptions, StatsHandler};

use super::make_spinner;

#[derive(Args)]
pub struct StatsCommand {
    /// path to the OSM PBF file
    #[clap(long, value_parser)]
    pbf_filename: String,

    /// number of decode workers
    #[clap(long, value_parser, default_value_t = 8)]
    workers: usize,
}

impl StatsCommand {
    pub fn run(self) -> anyhow::Result<()> {
        blue!("Counting elements in ");
        dark_yellow!("{}", self.pbf_filename);
        println!(" ...");

        let reader = BlobReader::from_path(&self.pbf_filename)?;
        let bar = make_spinner("decoding blocks");
        let outputs = run_pipeline(
            reader.inspect(|_| bar.inc(1)),
            PipelineOptions {
                workers: self.workers,
                ..Default::default()
            },
            |_worker| Ok(StatsHandler::default()),
            |_header| Ok(()),
        )?;
        bar.finish();

        let mut total = ElementCount::default();
        for count in outputs {
            total += count;
        }
        println!("{}", total);
        Ok(())
    }
}
