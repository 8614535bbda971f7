mod blobs;
mod convert;
mod elements;
mod stats;

use std::time::Duration;

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Subcommand)]
pub enum Commands {
    /// convert a PBF file directly to element tables
    Convert(convert::ConvertCommand),
    /// stage the raw PBF frames as a blob table
    Blobs(blobs::BlobsCommand),
    /// convert a staged blob table to element tables
    Elements(elements::ElementsCommand),
    /// count the elements of a PBF file
    Stats(stats::StatsCommand),
}

impl Commands {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Commands::Convert(command) => command.run(),
            Commands::Blobs(command) => command.run(),
            Commands::Elements(command) => command.run(),
            Commands::Stats(command) => command.run(),
        }
    }
}

pub(crate) fn make_spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{human_pos} / {per_sec}] {msg} [{elapsed}]")
            .expect("static template"),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
