//! # confsmith CLI
//!
//! Binary entry point for the `confsmith` command-line tool. It parses the
//! command line, runs the selected command and turns an error into a message
//! on stderr and a non-zero exit status.
//!
//! All composition logic lives in the library crate; commands are thin
//! wrappers over it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use console::style;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
