//! # Ls Command Implementation
//!
//! Lists the public tasks of a library, one `<group>/@<name>` per line, in
//! the form they are referenced from `.confsmith.yaml`.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confsmith::meta::list_public_tasks;

use super::open_library;

/// List the public tasks of a library
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Library directory containing task groups
    #[arg(value_name = "LIBRARY_DIR")]
    pub library: PathBuf,

    /// Show only the number of public tasks
    #[arg(long)]
    pub count: bool,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let store = open_library(&args.library)?;
    let tasks = list_public_tasks(&store)?;

    if args.count {
        println!("{}", tasks.len());
        return Ok(());
    }
    for task in tasks {
        println!("{}", task);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_execute_missing_library() {
        let args = LsArgs {
            library: PathBuf::from("/nonexistent/library"),
            count: false,
        };
        let err = execute(args).unwrap_err();
        assert!(err.to_string().contains("Library directory not found"));
    }

    #[test]
    fn test_execute_empty_library() {
        let temp = TempDir::new().unwrap();
        let args = LsArgs {
            library: temp.path().to_path_buf(),
            count: true,
        };
        assert!(execute(args).is_ok());
    }
}
