use anyhow::Context;
use clap::Parser;
use isoplot::{init_logging, run_job, summarize, Config, PlotJob};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "isoplot",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("ISOPLOT_BUILD_DATE"), ")"),
    about = "Turn PCB artwork primitives into isolation-routing chains"
)]
struct Cli {
    /// Job file (JSON) listing the grid size and primitives
    job: PathBuf,

    /// Configuration file (.json or .toml); defaults to the user config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        Config::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    let job = PlotJob::load(&cli.job)?;
    let output = run_job(&job, config.plot)?;
    print!("{}", summarize(&output));

    Ok(())
}
