//! # Info Command Implementation
//!
//! Shows what applying some library tasks involves: the variables a project
//! has to bind and the targets that will be written.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confsmith::meta::{extract_meta, TaskMeta};
use confsmith::output::{emoji, OutputConfig};
use confsmith::suggestions;

use super::open_library;

/// Show the variables and targets of library tasks
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Library directory containing task groups
    #[arg(value_name = "LIBRARY_DIR")]
    pub library: PathBuf,

    /// Tasks to inspect, e.g. editor/@default
    #[arg(value_name = "TASK", required = true)]
    pub tasks: Vec<String>,
}

/// Execute the `info` command.
pub fn execute(args: InfoArgs, output: &OutputConfig) -> Result<()> {
    let store = open_library(&args.library)?;
    let meta = extract_meta(&store, &args.tasks).map_err(suggestions::explain)?;
    print!("{}", render(&meta, output));
    Ok(())
}

fn render(meta: &TaskMeta, output: &OutputConfig) -> String {
    let mut text = String::new();
    text.push_str(&format!("{} Variables:\n", emoji(output, "🔤", "*")));
    if meta.variables.is_empty() {
        text.push_str("  (none)\n");
    }
    for variable in &meta.variables {
        text.push_str(&format!("  {}\n", variable));
    }
    text.push_str(&format!("{} Targets:\n", emoji(output, "📄", "*")));
    for target in &meta.targets {
        text.push_str(&format!("  {}\n", target));
    }
    text
}
