//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confsmith::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a new config file
/// - Using the -c/--config flag
/// - Using the CONFSMITH_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .confsmith.yaml file in your project root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set CONFSMITH_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a library directory that does not exist.
pub fn library_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Library directory not found: {path}\n\n\
         hint: A library directory contains task groups, e.g. <dir>/editor/@default.json\n\
         hint: Relative paths are resolved against the current directory",
        path = path.display()
    )
}

/// Generate an error for a malformed `--var` argument.
pub fn invalid_variable_binding(binding: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid variable binding: {binding}\n\n\
         hint: Bind variables as --var name=value\n\
         hint: Values that parse as JSON (numbers, lists, objects) are used as such"
    )
}

/// Attach a hint to an engine error where one helps.
pub fn explain(error: Error) -> anyhow::Error {
    let hint = match &error {
        Error::MissingVariable { .. } => {
            Some("hint: Add the variable under `variables:` in .confsmith.yaml")
        }
        Error::BadTaskName { .. } => {
            Some("hint: Run 'confsmith ls <LIBRARY_DIR>' to list the public tasks of a library")
        }
        Error::CycleDetected { .. } => {
            Some("hint: A composite task must not include itself, directly or through subtasks")
        }
        Error::MissingSnippetFile { .. } => {
            Some("hint: Snippets are looked up with and without json, yml, yaml, toml, ini, xml, txt and md extensions")
        }
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::anyhow!("{}\n\n{}", error, hint),
        None => anyhow::Error::new(error),
    }
}
