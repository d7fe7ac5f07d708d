//! Command-line entry point.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // CLI output belongs on stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    datasweep::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)
}
