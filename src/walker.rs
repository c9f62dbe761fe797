//! Recursive task-tree application
//!
//! Tasks are applied depth-first in declaration order. A leaf writes its
//! target unless the resolved target is excluded; a composite recurses into
//! its subtasks. Only writes that changed a target are reported.

use log::debug;

use crate::error::{Error, Result};
use crate::merge::MergePolicy;
use crate::storage::Storage;
use crate::task::{LoadedTask, TaskName, TaskStore};
use crate::vars::VariableMap;

/// Ordered `Updated: <target>` records of one run.
pub type ApplyResult = Vec<String>;

/// Everything a run needs besides storage.
#[derive(Debug, Clone)]
pub struct ApplyContext<'a> {
    pub store: &'a TaskStore,
    pub variables: &'a VariableMap,
    /// Resolved target paths that must not be written.
    pub exclude: &'a [String],
    pub policy: &'a MergePolicy,
}

/// Apply `task_names` and every task below them.
pub fn apply_tasks_rec<S: Storage + ?Sized>(
    ctx: &ApplyContext<'_>,
    storage: &mut S,
    task_names: &[String],
) -> Result<ApplyResult> {
    let names = task_names
        .iter()
        .map(|name| TaskName::parse(name))
        .collect::<Result<Vec<_>>>()?;
    let mut result = ApplyResult::new();
    let mut path = Vec::new();
    for name in &names {
        apply_task(ctx, storage, name, &mut path, &mut result)?;
    }
    Ok(result)
}

fn apply_task<S: Storage + ?Sized>(
    ctx: &ApplyContext<'_>,
    storage: &mut S,
    name: &TaskName,
    path: &mut Vec<TaskName>,
    result: &mut ApplyResult,
) -> Result<()> {
    if path.contains(name) {
        let cycle = path
            .iter()
            .skip_while(|ancestor| *ancestor != name)
            .chain(std::iter::once(name))
            .map(TaskName::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(Error::CycleDetected { cycle });
    }

    match ctx.store.load_task(name, ctx.variables, ctx.policy)? {
        LoadedTask::Leaf(leaf) => {
            let target = &leaf.task.target;
            if ctx.exclude.iter().any(|excluded| excluded == target) {
                debug!("Skipping excluded target {} ({})", target, name);
                return Ok(());
            }
            if storage.write(target, &leaf.to_write, &leaf.task.write_options())? {
                result.push(format!("Updated: {}", target));
            }
        }
        LoadedTask::Composite(composite) => {
            path.push(name.clone());
            for subtask in &composite.tasks {
                let child = name.qualify(subtask)?;
                apply_task(ctx, storage, &child, path, result)?;
            }
            path.pop();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn leaf(target: &str, snippet: &str) -> String {
        json!({
            "target": target,
            "strategy": "default",
            "snippets": [snippet],
            "requires": [],
            "purpose": ["p"]
        })
        .to_string()
    }

    fn library() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "js/@default.json", r##"{"description": "JS", "tasks": ["eslint", "#ci", "shared/gitignore"]}"##);
        write(root, "js/#ci.json", r#"{"description": "CI", "tasks": ["ci"]}"#);
        write(root, "js/eslint.json", &leaf(".eslintrc.json", "eslint"));
        write(root, "js/ci.json", &leaf("${ci_dir}/ci.yml", "ci"));
        write(root, "js/snippets/eslint.json", r#"{"root": true}"#);
        write(root, "js/snippets/ci.yml", "name: ci\n");
        write(root, "shared/gitignore.json", &leaf(".gitignore", "ignore"));
        write(root, "shared/snippets/ignore.txt", "node_modules\n");
        temp
    }

    fn vars() -> VariableMap {
        json!({"ci_dir": ".github/workflows"}).as_object().cloned().unwrap()
    }

    fn run(store: &TaskStore, storage: &mut MemoryStorage, exclude: &[String]) -> Result<ApplyResult> {
        let variables = vars();
        let policy = MergePolicy::default();
        let ctx = ApplyContext {
            store,
            variables: &variables,
            exclude,
            policy: &policy,
        };
        apply_tasks_rec(&ctx, storage, &["js/@default".to_string()])
    }

    #[test]
    fn test_applies_tree_in_order_with_namespacing() {
        let temp = library();
        let store = TaskStore::new(temp.path());
        let mut storage = MemoryStorage::new();
        let result = run(&store, &mut storage, &[]).unwrap();
        assert_eq!(
            result,
            vec![
                "Updated: .eslintrc.json",
                "Updated: .github/workflows/ci.yml",
                "Updated: .gitignore",
            ]
        );
    }

    #[test]
    fn test_second_run_is_empty() {
        let temp = library();
        let store = TaskStore::new(temp.path());
        let mut storage = MemoryStorage::new();
        run(&store, &mut storage, &[]).unwrap();
        assert!(run(&store, &mut storage, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_exclusion_uses_resolved_target() {
        let temp = library();
        let store = TaskStore::new(temp.path());
        let mut storage = MemoryStorage::new();
        let exclude = vec![".github/workflows/ci.yml".to_string()];
        let result = run(&store, &mut storage, &exclude).unwrap();
        assert_eq!(result.len(), 2);
        assert!(!storage.fs().exists(".github/workflows/ci.yml"));
    }

    #[test]
    fn test_unknown_subtask_fails() {
        let temp = library();
        write(temp.path(), "js/@default.json", r#"{"description": "JS", "tasks": ["nope"]}"#);
        let store = TaskStore::new(temp.path());
        let err = run(&store, &mut MemoryStorage::new(), &[]).unwrap_err();
        assert!(matches!(err, Error::BadTaskName { name } if name == "js/nope"));
    }

    #[test]
    fn test_cycle_detected() {
        let temp = library();
        write(temp.path(), "js/#ci.json", r#"{"description": "CI", "tasks": ["@default"]}"#);
        let store = TaskStore::new(temp.path());
        let err = run(&store, &mut MemoryStorage::new(), &[]).unwrap_err();
        match err {
            Error::CycleDetected { cycle } => {
                assert_eq!(cycle, "js/@default -> js/#ci -> js/@default")
            }
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_sibling_is_not_a_cycle() {
        let temp = library();
        write(
            temp.path(),
            "js/@default.json",
            r#"{"description": "JS", "tasks": ["eslint", "eslint"]}"#,
        );
        let store = TaskStore::new(temp.path());
        let result = run(&store, &mut MemoryStorage::new(), &[]).unwrap();
        assert_eq!(result, vec!["Updated: .eslintrc.json"]);
    }
}
