//! Library metadata: public task listing, variable and target extraction,
//! and the task tree used for display.
//!
//! None of these operations load fragments or touch targets.

use std::collections::HashSet;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::task::{TaskDefinition, TaskName, TaskStore};
use crate::vars::determine_vars;

/// Variables and targets referenced by a task tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskMeta {
    /// Variable names, first occurrence first.
    pub variables: Vec<String>,
    /// Unresolved target templates, first occurrence first.
    pub targets: Vec<String>,
}

/// One task in a display tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub name: String,
    /// Description of a composite, target of a leaf.
    pub label: String,
    pub children: Vec<TaskNode>,
}

/// All public tasks of the library at `task_dir`, sorted.
pub fn list_public_tasks(store: &TaskStore) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(store.task_dir()).min_depth(2).max_depth(2) {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to read task directory: {}", e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let (Some(stem), Some(group)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json && stem.starts_with('@') {
            names.push(format!("{}/{}", group, stem));
        }
    }
    names.sort();
    Ok(names)
}

/// Collect the variables and targets of `task_names` and everything below
/// them.
pub fn extract_meta(store: &TaskStore, task_names: &[String]) -> Result<TaskMeta> {
    let mut meta = TaskMeta::default();
    let mut seen = HashSet::new();
    for name in task_names {
        collect_meta(store, &TaskName::parse(name)?, &mut seen, &mut meta)?;
    }
    Ok(meta)
}

fn collect_meta(
    store: &TaskStore,
    name: &TaskName,
    seen: &mut HashSet<TaskName>,
    meta: &mut TaskMeta,
) -> Result<()> {
    if !seen.insert(name.clone()) {
        return Ok(());
    }
    match store.read_definition(name)? {
        TaskDefinition::Leaf(leaf) => {
            let mut templates = vec![serde_json::Value::String(leaf.target.clone())];
            templates.extend(
                leaf.snippets
                    .iter()
                    .filter_map(|snippet| snippet.variables())
                    .map(|local| serde_json::Value::Object(local.clone())),
            );
            for variable in determine_vars(&serde_json::Value::Array(templates)) {
                push_unique(&mut meta.variables, variable);
            }
            push_unique(&mut meta.targets, leaf.target);
        }
        TaskDefinition::Composite(composite) => {
            for subtask in &composite.tasks {
                collect_meta(store, &name.qualify(subtask)?, seen, meta)?;
            }
        }
    }
    Ok(())
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Build the display tree rooted at `name`.
pub fn task_tree(store: &TaskStore, name: &str) -> Result<TaskNode> {
    build_node(store, &TaskName::parse(name)?, &mut Vec::new())
}

fn build_node(store: &TaskStore, name: &TaskName, path: &mut Vec<TaskName>) -> Result<TaskNode> {
    if path.contains(name) {
        let mut cycle: Vec<String> = path.iter().map(TaskName::to_string).collect();
        cycle.push(name.to_string());
        return Err(Error::CycleDetected {
            cycle: cycle.join(" -> "),
        });
    }
    match store.read_definition(name)? {
        TaskDefinition::Leaf(leaf) => Ok(TaskNode {
            name: name.to_string(),
            label: leaf.target,
            children: Vec::new(),
        }),
        TaskDefinition::Composite(composite) => {
            path.push(name.clone());
            let children = composite
                .tasks
                .iter()
                .map(|subtask| build_node(store, &name.qualify(subtask)?, path))
                .collect::<Result<Vec<_>>>()?;
            path.pop();
            Ok(TaskNode {
                name: name.to_string(),
                label: composite.description,
                children,
            })
        }
    }
}
