use anyhow::Result;
use clap::Parser;
use defectlens::cli::{run, Cli};

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}
