//! Run configured libraries against a project.

use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::merge::MergePolicy;
use crate::meta::{extract_meta, list_public_tasks};
use crate::storage::Storage;
use crate::task::TaskStore;
use crate::vars::VariableMap;
use crate::walker::{apply_tasks_rec, ApplyContext, ApplyResult};

/// Apply every library of `config` to the project at `project_root`, in
/// declaration order.
pub fn execute<S: Storage + ?Sized>(
    project_root: &Path,
    config: &Config,
    storage: &mut S,
) -> Result<ApplyResult> {
    let mut result = ApplyResult::new();
    for (name, library) in &config.libraries {
        let store = TaskStore::new(library.task_dir(project_root));
        info!(
            "Applying library {} from {} ({} task(s))",
            name,
            store.task_dir().display(),
            library.tasks.len()
        );
        let policy = library.merge_policy();
        let ctx = ApplyContext {
            store: &store,
            variables: &library.variables,
            exclude: &library.exclude,
            policy: &policy,
        };
        result.extend(apply_tasks_rec(&ctx, storage, &library.tasks)?);
    }
    Ok(result)
}

/// Apply every public task of a library, as a self-test.
///
/// Variables the library references but `variables` does not bind default to
/// their own name. Binding a variable the library never references is an
/// error.
pub fn render_library<S: Storage + ?Sized>(
    store: &TaskStore,
    storage: &mut S,
    variables: &VariableMap,
) -> Result<ApplyResult> {
    let tasks = list_public_tasks(store)?;
    let meta = extract_meta(store, &tasks)?;

    let unexpected: Vec<&str> = variables
        .keys()
        .filter(|name| !meta.variables.contains(*name))
        .map(String::as_str)
        .collect();
    if !unexpected.is_empty() {
        return Err(Error::Validation {
            task: store.task_dir().display().to_string(),
            message: format!("Unexpected variable(s) provided: {}", unexpected.join(", ")),
        });
    }

    let mut bindings = variables.clone();
    for name in &meta.variables {
        if !bindings.contains_key(name) {
            debug!("Defaulting variable {} to its name", name);
            bindings.insert(name.clone(), Value::String(name.clone()));
        }
    }

    let policy = MergePolicy::default();
    let ctx = ApplyContext {
        store,
        variables: &bindings,
        exclude: &[],
        policy: &policy,
    };
    apply_tasks_rec(&ctx, storage, &tasks)
}
