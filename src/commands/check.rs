//! # Check Command Implementation
//!
//! Computes what `apply` would change without writing anything. Exits
//! successfully when every target is up to date and with an error listing
//! the count otherwise, which makes it usable as a CI gate.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confsmith::orchestrator;
use confsmith::output::{emoji, update_line, OutputConfig};
use confsmith::storage::DiskStorage;
use confsmith::suggestions;

use super::load_project;

/// Report targets that are out of date
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project root (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Path to the configuration file (defaults to .confsmith.yaml in the project root)
    #[arg(short, long, value_name = "FILE", env = "CONFSMITH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    let project = load_project(args.project, args.config)?;

    let mut storage = DiskStorage::new(&project.root).dry_run(true);
    let result = orchestrator::execute(&project.root, &project.config, &mut storage)
        .map_err(suggestions::explain)?;

    if result.is_empty() {
        println!("{} All targets are up to date", emoji(output, "✅", "[OK]"));
        return Ok(());
    }

    for record in &result {
        println!("{}", update_line(output, record));
    }
    anyhow::bail!(
        "{} target(s) out of date; run 'confsmith apply' to update them",
        result.len()
    )
}
