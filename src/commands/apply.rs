//! # Apply Command Implementation
//!
//! Applies every library listed in the project's `.confsmith.yaml` and prints
//! one `Updated: <target>` line per target whose content changed. With
//! `--dry-run` the changes are computed and reported but nothing is written.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confsmith::orchestrator;
use confsmith::output::{emoji, update_line, OutputConfig};
use confsmith::storage::DiskStorage;
use confsmith::suggestions;

use super::load_project;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Project root (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Path to the configuration file (defaults to .confsmith.yaml in the project root)
    #[arg(short, long, value_name = "FILE", env = "CONFSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would be updated without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, output: &OutputConfig) -> Result<()> {
    let project = load_project(args.project, args.config)?;

    if !args.quiet && args.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(output, "🔎", "[DRY RUN]")
        );
    }

    let mut storage = DiskStorage::new(&project.root).dry_run(args.dry_run);
    let result = orchestrator::execute(&project.root, &project.config, &mut storage)
        .map_err(suggestions::explain)?;

    if !args.quiet {
        for record in &result {
            println!("{}", update_line(output, record));
        }
        if result.is_empty() {
            println!("{} Everything is up to date", emoji(output, "✅", "[OK]"));
        }
    }

    Ok(())
}
