//! Write strategies
//!
//! A leaf task names the strategy used to combine the document it composed
//! (the *changeset*) with whatever its target already contains. When the
//! target does not exist yet, every strategy writes the changeset unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::deep::merge_values;
use crate::merge::{lines, structural, ArrayMergeMode, MergePolicy};

/// How a composed document is combined with an existing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Deep merge; the changeset wins and array items are appended once.
    #[default]
    Default,
    /// The changeset replaces the existing document.
    Overwrite,
    /// Keep the existing title line, replace everything below it.
    MergeBelowTitle,
    /// Changeset lines first, then existing lines not in the changeset.
    UniqueTop,
    /// Existing lines not in the changeset, then changeset lines.
    UniqueBottom,
    /// Structural reconciliation of element trees.
    XmlMerge,
}

impl Strategy {
    /// Combine `existing` (if any) with `changeset`.
    pub fn apply(self, existing: Option<&Value>, changeset: &Value) -> Value {
        let Some(existing) = existing else {
            return changeset.clone();
        };

        match self {
            Strategy::Default => merge_values(
                existing,
                changeset,
                &MergePolicy::with_arrays(ArrayMergeMode::AppendUnique),
                "",
            ),
            Strategy::Overwrite => changeset.clone(),
            Strategy::MergeBelowTitle => {
                line_merge(existing, changeset, lines::merge_below_title)
            }
            Strategy::UniqueTop => line_merge(existing, changeset, lines::unique_top),
            Strategy::UniqueBottom => line_merge(existing, changeset, lines::unique_bottom),
            Strategy::XmlMerge => structural::reconcile(existing, changeset),
        }
    }

    /// Kebab-case name, as written in task definitions.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Default => "default",
            Strategy::Overwrite => "overwrite",
            Strategy::MergeBelowTitle => "merge-below-title",
            Strategy::UniqueTop => "unique-top",
            Strategy::UniqueBottom => "unique-bottom",
            Strategy::XmlMerge => "xml-merge",
        }
    }
}

fn line_merge(
    existing: &Value,
    changeset: &Value,
    merge: fn(&[Value], &[Value]) -> Vec<Value>,
) -> Value {
    match (existing, changeset) {
        (Value::Array(old), Value::Array(new)) => Value::Array(merge(old, new)),
        _ => changeset.clone(),
    }
}
