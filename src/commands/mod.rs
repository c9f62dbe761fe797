//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `confsmith` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `confsmith` library.
//!
//! Helpers shared by several commands (locating the project configuration,
//! opening a library, parsing `--var` bindings) live here.

pub mod apply;
pub mod check;
pub mod info;
pub mod ls;
pub mod render;
pub mod tree;

use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

use confsmith::config::{self, Config, CONFIG_FILE_NAMES};
use confsmith::suggestions;
use confsmith::task::TaskStore;

/// A project root together with its parsed configuration.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

/// Resolve the project root and load its configuration.
///
/// The root defaults to the current directory; the configuration file
/// defaults to the first of `.confsmith.yaml`, `.confsmith.yml` and
/// `.confsmith.json` found in the root.
pub fn load_project(project: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Project> {
    let root = match project {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let config_path = match config_path.or_else(|| config::find_config(&root)) {
        Some(path) if path.is_file() => path,
        Some(path) => return Err(suggestions::config_not_found(&path)),
        None => return Err(suggestions::config_not_found(&root.join(CONFIG_FILE_NAMES[0]))),
    };

    let config = config::from_file(&config_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load config from {}: {}",
            config_path.display(),
            e
        )
    })?;
    Ok(Project { root, config })
}

/// Open the library at `dir`.
pub fn open_library(dir: &Path) -> Result<TaskStore> {
    if !dir.is_dir() {
        return Err(suggestions::library_not_found(dir));
    }
    Ok(TaskStore::new(dir))
}

/// Parse a `name=value` binding. Values that parse as JSON are used as such,
/// anything else is a string.
pub fn parse_var(binding: &str) -> Result<(String, Value)> {
    match binding.split_once('=') {
        Some((name, value)) if !name.is_empty() => {
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            Ok((name.to_string(), value))
        }
        _ => Err(suggestions::invalid_variable_binding(binding)),
    }
}
