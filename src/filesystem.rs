//! In-memory filesystem used as a storage backend for tests, benches and
//! previews

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// A file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }

    /// Get file size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Content as UTF-8 text
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|e| Error::Filesystem {
            message: format!("File is not valid UTF-8: {}", e),
        })
    }
}

/// In-memory filesystem keyed by normalized relative paths
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, File>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) -> Result<()> {
        let path = normalize(path.as_ref())?;
        self.files.insert(path, file);
        Ok(())
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        self.add_file(path, File::from_string(content))
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        let path = normalize(path.as_ref()).ok()?;
        self.files.get(&path)
    }

    /// Read a file as text, `None` if it does not exist
    pub fn read_string<P: AsRef<Path>>(&self, path: P) -> Result<Option<String>> {
        self.get_file(path)
            .map(|file| file.text().map(str::to_string))
            .transpose()
    }

    /// Remove a file
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<File>> {
        let path = normalize(path.as_ref())?;
        Ok(self.files.remove(&path))
    }

    /// Check if a file exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.get_file(path).is_some()
    }

    /// List all files, sorted by path
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over all files as (path, file) pairs
    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &File)> {
        self.files.iter()
    }
}

/// Strip `.` components and reject paths that leave the root.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(Error::Filesystem {
                        message: format!("Path escapes the root: {}", path.display()),
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::Filesystem {
                    message: format!("Absolute paths are not supported: {}", path.display()),
                });
            }
        }
    }
    if normalized.as_os_str().is_empty() {
        return Err(Error::Filesystem {
            message: "Empty path".to_string(),
        });
    }
    Ok(normalized)
}
