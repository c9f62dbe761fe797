//! # Error Handling
//!
//! This module defines the centralized error type for `confsmith`. It uses
//! `thiserror` to build a single `Error` enum covering every failure mode of
//! the composition engine, each carrying enough context to explain what went
//! wrong without a backtrace.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants map onto the engine's error
//!   taxonomy:
//!   - validation of task definitions (`Validation`, `InvalidTaskShape`),
//!   - unresolved variable references (`MissingVariable`),
//!   - unresolvable names in the task or fragment store (`BadTaskName`,
//!     `MissingSnippetFile`),
//!   - recursive task inclusion (`CycleDetected`),
//!   - project configuration problems (`ConfigParse`),
//!   - document parsing and rendering (`Format`),
//!   - storage failures (`Filesystem`, `Io`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Merging itself never fails, so there is no merge error variant. Every
//! error aborts the whole invocation; targets written before the failure stay
//! written.

use thiserror::Error;

/// Main error type for confsmith operations
#[derive(Error, Debug)]
pub enum Error {
    /// A task definition failed validation.
    #[error("Invalid task {task}: {message}")]
    Validation { task: String, message: String },

    /// A task definition is neither a well-formed leaf nor a well-formed
    /// composite (both or neither of `target` / `tasks`, stray keys, ...).
    #[error("Invalid task shape for {task}: {message}")]
    InvalidTaskShape { task: String, message: String },

    /// A variable reference could not be resolved during a strict pass.
    #[error("Missing variable: {name}")]
    MissingVariable { name: String },

    /// A task name could not be resolved in the task store.
    #[error("Bad task name: {name}")]
    BadTaskName { name: String },

    /// A snippet name could not be resolved in its group's fragment store.
    #[error("Missing snippet file: {name} (searched in {dir})")]
    MissingSnippetFile { name: String, dir: String },

    /// A composite task includes itself, directly or transitively.
    #[error("Cycle detected in task tree: {cycle}")]
    CycleDetected { cycle: String },

    /// An error occurred while parsing the `.confsmith.yaml` project file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A document could not be parsed from, or rendered to, its format.
    #[error("{format} format error: {message}")]
    Format { format: String, message: String },

    /// A storage operation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `Format` error from any displayable cause.
    pub fn format(format: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::Format {
            format: format.into(),
            message: cause.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
