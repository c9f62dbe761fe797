//! # Target Storage
//!
//! The engine reads and writes targets through the [`Storage`] trait.
//! Implementations only provide raw text access; parsing, strategy
//! application, rendering and the write-if-changed decision are shared
//! provided methods, so every backend reports changes identically.
//!
//! - [`DiskStorage`] resolves targets against a project root and can run in
//!   dry-run mode.
//! - [`MemoryStorage`] keeps everything in a [`MemoryFS`].

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::error::Result;
use crate::filesystem::{normalize, MemoryFS};
use crate::format::Format;
use crate::strategy::Strategy;

/// How a composed document is written to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Format override; detected from the target's extension when `None`.
    pub format: Option<Format>,
    /// Combination with existing content.
    pub strategy: Strategy,
    /// Whether a missing target may be created.
    pub create: bool,
}

impl WriteOptions {
    /// Options for a target whose format comes from its extension.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            format: None,
            strategy,
            create: true,
        }
    }

    fn format_for(&self, path: &str) -> Format {
        self.format.unwrap_or_else(|| Format::from_path(path))
    }
}

/// Raw text access to targets, plus the shared read/write logic.
pub trait Storage {
    /// Content of `path`, or `None` if it does not exist.
    fn read_raw(&self, path: &str) -> Result<Option<String>>;

    /// Replace the content of `path`, creating it if needed.
    fn write_raw(&mut self, path: &str, content: &str) -> Result<()>;

    /// Parse the content of `path`.
    fn read(&self, path: &str, format: Option<Format>) -> Result<Option<Value>> {
        let format = format.unwrap_or_else(|| Format::from_path(path));
        self.read_raw(path)?
            .map(|content| format.parse(&content))
            .transpose()
    }

    /// Combine `document` with the current content of `path` and write the
    /// result if it differs from what is there.
    ///
    /// Returns `true` iff the target content changed (or would change, for a
    /// dry run). A missing target is left alone when `create` is false.
    fn write(&mut self, path: &str, document: &Value, options: &WriteOptions) -> Result<bool> {
        let format = options.format_for(path);
        let raw = self.read_raw(path)?;
        if raw.is_none() && !options.create {
            return Ok(false);
        }

        let existing = raw.as_deref().map(|content| format.parse(content)).transpose()?;
        let merged = options.strategy.apply(existing.as_ref(), document);
        let rendered = format.render(&merged)?;
        if raw.as_deref() == Some(rendered.as_str()) {
            return Ok(false);
        }

        info!("Writing {} ({}, {})", path, format, options.strategy.name());
        self.write_raw(path, &rendered)?;
        Ok(true)
    }
}

/// Targets on disk, relative to a project root.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
    dry_run: bool,
}

impl DiskStorage {
    /// Storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Report changes without writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether writes are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Targets must stay below the root: absolute paths and `..` escapes
    /// are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        Ok(self.root.join(normalize(Path::new(path))?))
    }
}

impl Storage for DiskStorage {
    fn read_raw(&self, path: &str) -> Result<Option<String>> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(full)?))
    }

    fn write_raw(&mut self, path: &str, content: &str) -> Result<()> {
        let full = self.resolve(path)?;
        if self.dry_run {
            return Ok(());
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }
}

/// Targets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    fs: MemoryFS,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage seeded with existing files.
    pub fn with_files(fs: MemoryFS) -> Self {
        Self { fs }
    }

    /// The backing filesystem.
    pub fn fs(&self) -> &MemoryFS {
        &self.fs
    }
}

impl Storage for MemoryStorage {
    fn read_raw(&self, path: &str) -> Result<Option<String>> {
        self.fs.read_string(path)
    }

    fn write_raw(&mut self, path: &str, content: &str) -> Result<()> {
        self.fs.add_file_string(path, content)
    }
}
