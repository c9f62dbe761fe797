//! Structural reconciliation for markup-like documents
//!
//! Used by the `xml-merge` strategy. A freshly composed element tree (the
//! *changeset*) is merged into the element tree already on disk (*existing*)
//! without destroying elements the changeset knows nothing about.
//!
//! ## Algorithm
//!
//! For each member of an existing element, in existing order:
//!
//! 1. Non-array members (attributes, names, text): the changeset's value wins
//!    when present, otherwise the existing value is kept.
//! 2. Array members (ordered child slots): a cursor walks the changeset's
//!    children. Each existing child that *contains* the next unconsumed
//!    changeset child is replaced by the recursive merge of the pair and the
//!    cursor advances; every other existing child is kept verbatim and in
//!    place. Changeset children left over at the end are appended in order.
//! 3. Character content (text and CDATA children) is not matched by the
//!    cursor. When the changeset has any, they replace the existing ones at
//!    the position of the first existing text node, or are appended when the
//!    element had none. Otherwise existing text is kept as is. Adjacent text
//!    nodes do not survive a render and re-parse, so they are never produced
//!    from a single-text changeset.
//!
//! Matching is greedy, forward-only and first-fit: a changeset child only ever
//! matches a later existing child than the previous match, existing content is
//! never reordered, and there is no scoring.
//!
//! Members that only the changeset has are appended after the existing ones,
//! so an element that previously had no attributes or children can gain them.
//!
//! Inputs are borrowed immutably and a new tree is returned.

use serde_json::{Map, Value};

/// Reconcile `changeset` into `existing`, returning the merged tree.
///
/// # Examples
///
/// ```
/// use confsmith::merge::structural::reconcile;
/// use serde_json::json;
///
/// let existing = json!({"elements": [
///     {"type": "element", "name": "a"},
///     {"type": "element", "name": "mine"},
/// ]});
/// let changeset = json!({"elements": [
///     {"type": "element", "name": "a"},
///     {"type": "element", "name": "b"},
/// ]});
/// let merged = reconcile(&existing, &changeset);
/// assert_eq!(merged, json!({"elements": [
///     {"type": "element", "name": "a"},
///     {"type": "element", "name": "mine"},
///     {"type": "element", "name": "b"},
/// ]}));
/// ```
pub fn reconcile(existing: &Value, changeset: &Value) -> Value {
    let (Value::Object(existing_map), Value::Object(changes)) = (existing, changeset) else {
        return changeset.clone();
    };

    let mut merged = Map::new();
    for (key, value) in existing_map {
        let next = match (value, changes.get(key)) {
            (Value::Array(children), Some(Value::Array(incoming))) => {
                Value::Array(reconcile_children(children, incoming))
            }
            (Value::Array(_), _) => value.clone(),
            (_, Some(incoming)) => incoming.clone(),
            (_, None) => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    for (key, value) in changes {
        if !existing_map.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

fn reconcile_children(existing: &[Value], changeset: &[Value]) -> Vec<Value> {
    let (texts, nodes): (Vec<&Value>, Vec<&Value>) =
        changeset.iter().partition(|child| is_character_data(child));

    let mut next = 0;
    let mut texts_placed = false;
    let mut merged = Vec::with_capacity(existing.len() + changeset.len());

    for child in existing {
        if is_character_data(child) && !texts.is_empty() {
            if !texts_placed {
                merged.extend(texts.iter().map(|text| (*text).clone()));
                texts_placed = true;
            }
            continue;
        }
        match nodes.get(next) {
            Some(candidate) if contains(child, &match_key(candidate)) => {
                merged.push(reconcile(child, candidate));
                next += 1;
            }
            _ => merged.push(child.clone()),
        }
    }

    merged.extend(nodes[next..].iter().map(|node| (*node).clone()));
    if !texts_placed {
        merged.extend(texts.into_iter().cloned());
    }
    merged
}

/// Text and CDATA nodes: an element's character content.
fn is_character_data(node: &Value) -> bool {
    matches!(
        node.get("type").and_then(Value::as_str),
        Some("text") | Some("cdata")
    )
}

/// The part of a changeset element used for matching: everything except its
/// nested child lists.
fn match_key(element: &Value) -> Value {
    match element {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, value)| !value.is_array())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Deep-subset test: is every part of `probe` present in `container`?
///
/// Objects match member-wise, every array item of `probe` must be contained
/// by some item of `container`, scalars must be equal.
pub fn contains(container: &Value, probe: &Value) -> bool {
    match (container, probe) {
        (Value::Object(outer), Value::Object(inner)) => inner.iter().all(|(key, value)| {
            outer
                .get(key)
                .is_some_and(|candidate| contains(candidate, value))
        }),
        (Value::Array(outer), Value::Array(inner)) => inner
            .iter()
            .all(|value| outer.iter().any(|candidate| contains(candidate, value))),
        _ => container == probe,
    }
}
