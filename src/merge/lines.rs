//! Line-oriented merge policies
//!
//! Plain-text targets (`.gitignore`, `.npmignore`, markdown, ...) are
//! documents made of one entry per line. These policies combine the lines of
//! an existing file with the lines of a changeset.
//!
//! Every policy is idempotent: applying it a second time with the same
//! changeset returns its own previous output.

use serde_json::Value;

/// Keep the existing file's title line, then the changeset.
///
/// The title is the first line of the existing file; an empty existing file
/// contributes nothing. A changeset that starts with the same title line does
/// not repeat it.
pub fn merge_below_title(existing: &[Value], changeset: &[Value]) -> Vec<Value> {
    let Some(title) = existing.first() else {
        return changeset.to_vec();
    };
    let body = match changeset.first() {
        Some(first) if first == title => &changeset[1..],
        _ => changeset,
    };
    std::iter::once(title).chain(body.iter()).cloned().collect()
}

/// Changeset lines first, then existing lines the changeset does not have.
pub fn unique_top(existing: &[Value], changeset: &[Value]) -> Vec<Value> {
    let mut merged = dedup(changeset.iter());
    for line in existing {
        if !merged.contains(line) {
            merged.push(line.clone());
        }
    }
    merged
}

/// Existing lines the changeset does not have, then changeset lines.
pub fn unique_bottom(existing: &[Value], changeset: &[Value]) -> Vec<Value> {
    let mut merged = dedup(
        existing
            .iter()
            .filter(|line| !changeset.contains(line)),
    );
    for line in changeset {
        if !merged.contains(line) {
            merged.push(line.clone());
        }
    }
    merged
}

fn dedup<'a>(lines: impl Iterator<Item = &'a Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for line in lines {
        if !unique.contains(line) {
            unique.push(line.clone());
        }
    }
    unique
}
