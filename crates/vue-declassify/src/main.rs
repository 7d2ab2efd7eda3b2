//! vue-declassify: rewrites Vue class components into `Vue.extend` objects.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::{Args, Command};
use miette::{IntoDiagnostic, Result};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Declassify(args) => {
            let summary = orchestrator::run(&args).into_diagnostic()?;
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
