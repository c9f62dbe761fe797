//! Merge operations for composed documents
//!
//! This module holds the merge policies used while composing and writing
//! targets. Each policy has its own submodule.
//!
//! ## Submodules
//!
//! - `deep` - Order-sensitive deep merge of snippet fragments (and of an
//!   existing document with a changeset for the `default` strategy)
//! - `structural` - Tree-aware reconciliation for markup-like documents that
//!   preserves hand-written elements
//! - `lines` - Line-oriented policies for plain-text targets
//!
//! ## Common Types
//!
//! [`ArrayMergeMode`] and [`MergePolicy`] are passed explicitly into the deep
//! merge so that array handling is a documented parameter rather than a
//! convention inferred at the call site.

pub mod deep;
pub mod lines;
pub mod structural;

use serde::{Deserialize, Serialize};

/// Default key marking a fragment value as a full replacement.
pub const DEFAULT_REPLACE_MARKER: &str = "$replace";

/// How arrays present on both sides of a deep merge are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayMergeMode {
    /// Concatenate: earlier items first, later items after.
    #[default]
    Append,
    /// The later array replaces the earlier one.
    Replace,
    /// Append only the later items not already present.
    AppendUnique,
}

/// Explicit policy for deep merging.
///
/// A value written as a single-key object `{"<replace_marker>": value}` is a
/// full replacement: it discards whatever earlier documents contributed at
/// that position, regardless of `arrays`. Markers are always unwrapped in the
/// merge result.
///
/// # Examples
///
/// ```
/// use confsmith::merge::{ArrayMergeMode, MergePolicy};
///
/// let policy = MergePolicy::default();
/// assert_eq!(policy.arrays, ArrayMergeMode::Append);
/// assert_eq!(policy.replace_marker.as_deref(), Some("$replace"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    /// Array combination mode.
    pub arrays: ArrayMergeMode,
    /// Key of the full-replacement wrapper, or `None` to disable it.
    pub replace_marker: Option<String>,
}

impl MergePolicy {
    /// Policy with the given array mode and the default replace marker.
    pub fn with_arrays(arrays: ArrayMergeMode) -> Self {
        Self {
            arrays,
            ..Self::default()
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            arrays: ArrayMergeMode::Append,
            replace_marker: Some(DEFAULT_REPLACE_MARKER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_mode_kebab_case() {
        let mode: ArrayMergeMode = serde_yaml::from_str("append-unique").unwrap();
        assert_eq!(mode, ArrayMergeMode::AppendUnique);
        let mode: ArrayMergeMode = serde_yaml::from_str("replace").unwrap();
        assert_eq!(mode, ArrayMergeMode::Replace);
    }

    #[test]
    fn test_with_arrays_keeps_marker() {
        let policy = MergePolicy::with_arrays(ArrayMergeMode::Replace);
        assert_eq!(policy.arrays, ArrayMergeMode::Replace);
        assert_eq!(policy.replace_marker.as_deref(), Some(DEFAULT_REPLACE_MARKER));
    }
}
