//! Snippet (fragment) loading
//!
//! Fragments live in `<task_dir>/<group>/snippets/` and are referenced by
//! name, with or without their file extension.

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::vars::{populate_lazy, Partial, VariableMap};

/// Find the file backing fragment `name` in `snippet_dir`.
///
/// An exact file name wins. Otherwise the extensions of `format` are tried
/// when it is set, else the extensions of every format in probe order.
pub fn find_snippet(snippet_dir: &Path, name: &str, format: Option<Format>) -> Option<PathBuf> {
    let exact = snippet_dir.join(name);
    if exact.is_file() {
        return Some(exact);
    }

    let candidates: Vec<Format> = match format {
        Some(format) => vec![format],
        None => Format::PROBE_ORDER.to_vec(),
    };
    candidates
        .into_iter()
        .flat_map(|format| format.extensions().iter())
        .map(|ext| snippet_dir.join(format!("{}.{}", name, ext)))
        .find(|path| path.is_file())
}

/// Load fragment `name`, parse it and substitute its local variables.
///
/// The fragment is parsed as `task_format` when the task sets one, else by
/// the found file's extension. Substitution is lazy: references the local
/// variables do not bind are left in place.
pub fn load_snippet(
    snippet_dir: &Path,
    name: &str,
    task_format: Option<Format>,
    local_vars: &VariableMap,
) -> Result<Partial> {
    let path = find_snippet(snippet_dir, name, task_format).ok_or_else(|| {
        Error::MissingSnippetFile {
            name: name.to_string(),
            dir: snippet_dir.display().to_string(),
        }
    })?;
    debug!("Loading snippet {}", path.display());

    let format = task_format.unwrap_or_else(|| Format::from_path(&path));
    let content = std::fs::read_to_string(&path)?;
    let fragment = format.parse(&content)?;
    Ok(populate_lazy(&fragment, local_vars))
}
