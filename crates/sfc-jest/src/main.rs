//! sfc-jest: single-file components to CommonJS test modules.

mod cli;
mod error;
mod inputs;
mod logging;
mod orchestrator;
mod output;
mod toolchain;

use clap::Parser;
use cli::Args;
use miette::Result;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let summary = orchestrator::run(&args)?;
    tracing::debug!(
        "{} transformed, {} failed",
        summary.transformed,
        summary.failed
    );
    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
