//! Deep merge of JSON-shaped documents
//!
//! This is the merge used to fold a leaf task's snippet fragments into one
//! document, and (with [`ArrayMergeMode::AppendUnique`]) the `default` write
//! strategy.
//!
//! ## Rules
//!
//! - Objects: key-wise union; keys on both sides merge recursively
//! - Arrays: combined according to [`MergePolicy::arrays`]
//! - Scalars: the later value wins
//! - Mismatched shapes: the later value wins, with a warning
//! - Replace markers: `{"$replace": value}` discards the earlier value
//!
//! Inputs are never mutated; a fresh document is returned.

use log::warn;
use serde_json::{Map, Value};

use super::{ArrayMergeMode, MergePolicy};

/// Merge `documents` in order; later documents take precedence.
///
/// An empty input produces an empty object.
///
/// # Examples
///
/// ```
/// use confsmith::merge::{deep::merge_all, MergePolicy};
/// use serde_json::json;
///
/// let merged = merge_all(
///     vec![json!({"x": 1, "a": [1, 2]}), json!({"x": 2, "a": [3]})],
///     &MergePolicy::default(),
/// );
/// assert_eq!(merged, json!({"x": 2, "a": [1, 2, 3]}));
/// ```
pub fn merge_all<I>(documents: I, policy: &MergePolicy) -> Value
where
    I: IntoIterator<Item = Value>,
{
    documents
        .into_iter()
        .fold(None, |merged: Option<Value>, document| {
            Some(match merged {
                None => unwrap_markers(&document, policy),
                Some(base) => merge_values(&base, &document, policy, ""),
            })
        })
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Merge `overlay` on top of `base`.
///
/// `path` is the dotted location of the pair, used for log messages only.
pub fn merge_values(base: &Value, overlay: &Value, policy: &MergePolicy, path: &str) -> Value {
    if let Some(replacement) = replacement(overlay, policy) {
        return unwrap_markers(replacement, policy);
    }

    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                let next = match merged.get(key) {
                    Some(existing) => merge_values(existing, value, policy, &child_path),
                    None => unwrap_markers(value, policy),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            let additions = overlay_items.iter().map(|item| unwrap_markers(item, policy));
            match policy.arrays {
                ArrayMergeMode::Append => {
                    Value::Array(base_items.iter().cloned().chain(additions).collect())
                }
                ArrayMergeMode::Replace => Value::Array(additions.collect()),
                ArrayMergeMode::AppendUnique => {
                    let mut merged = base_items.clone();
                    for item in additions {
                        if !merged.contains(&item) {
                            merged.push(item);
                        }
                    }
                    Value::Array(merged)
                }
            }
        }
        (Value::Null, _) => unwrap_markers(overlay, policy),
        _ => {
            if is_container(base) || is_container(overlay) {
                warn!(
                    "Type mismatch at path '{}': replacing {} with {}",
                    path,
                    type_name(base),
                    type_name(overlay)
                );
            }
            unwrap_markers(overlay, policy)
        }
    }
}

/// Return a copy of `value` with every replace marker unwrapped.
pub fn unwrap_markers(value: &Value, policy: &MergePolicy) -> Value {
    if let Some(inner) = replacement(value, policy) {
        return unwrap_markers(inner, policy);
    }
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), unwrap_markers(item, policy)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| unwrap_markers(item, policy))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn replacement<'a>(value: &'a Value, policy: &MergePolicy) -> Option<&'a Value> {
    let marker = policy.replace_marker.as_deref()?;
    match value {
        Value::Object(map) if map.len() == 1 => map.get(marker),
        _ => None,
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Get a human-readable type name for a value, for log messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
