//! # Task Definitions and the Task Store
//!
//! A library is a directory of task groups. Each group holds task files
//! named `<id>.json` and a `snippets/` directory of fragments:
//!
//! ```text
//! <task_dir>/
//!   editor/
//!     @default.json        composite, public
//!     #common.json         composite, internal grouping
//!     editorconfig.json    leaf
//!     snippets/
//!       editorconfig.ini
//! ```
//!
//! Tasks are addressed as `<group>/<id>`. Ids starting with `@` or `#` name
//! composite tasks, every other id names a leaf task.
//!
//! [`TaskStore::load_task`] reads a definition, validates it and, for a leaf,
//! resolves its target and merges its fragments into the document to write.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::merge::{deep::merge_all, MergePolicy};
use crate::snippet::load_snippet;
use crate::storage::WriteOptions;
use crate::strategy::Strategy;
use crate::validate::validate_task;
use crate::vars::{populate_str, populate_strict, VariableMap};

/// A task address, `<group>/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskName {
    pub group: String,
    pub id: String,
}

impl TaskName {
    /// Parse a qualified name.
    pub fn parse(name: &str) -> Result<Self> {
        match name.split_once('/') {
            Some((group, id)) if !group.is_empty() && !id.is_empty() && !id.contains('/') => {
                Ok(Self {
                    group: group.to_string(),
                    id: id.to_string(),
                })
            }
            _ => Err(Error::BadTaskName {
                name: name.to_string(),
            }),
        }
    }

    /// Resolve a subtask reference relative to this task: a bare name stays
    /// in this task's group, a qualified name is used as-is.
    pub fn qualify(&self, subtask: &str) -> Result<Self> {
        if subtask.contains('/') {
            Self::parse(subtask)
        } else {
            Self::parse(&format!("{}/{}", self.group, subtask))
        }
    }

    /// Public composites can be referenced from project configuration.
    pub fn is_public(&self) -> bool {
        self.id.starts_with('@')
    }

    /// Ids reserved for composite tasks.
    pub fn is_composite_id(&self) -> bool {
        self.id.starts_with('@') || self.id.starts_with('#')
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.id)
    }
}

/// A fragment reference inside a leaf task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnippetRef {
    /// Fragment used without local variables.
    Name(String),
    /// Fragment with its own variable bindings.
    Bound(BoundSnippet),
}

/// A fragment name with local variable bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundSnippet {
    pub name: String,
    pub variables: VariableMap,
}

impl SnippetRef {
    /// The fragment name.
    pub fn name(&self) -> &str {
        match self {
            SnippetRef::Name(name) => name,
            SnippetRef::Bound(bound) => &bound.name,
        }
    }

    /// Local variable bindings, if any.
    pub fn variables(&self) -> Option<&VariableMap> {
        match self {
            SnippetRef::Name(_) => None,
            SnippetRef::Bound(bound) => Some(&bound.variables),
        }
    }
}

fn default_create() -> bool {
    true
}

/// A task that composes one target from fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeafTask {
    pub target: String,
    #[serde(default)]
    pub format: Option<Format>,
    pub strategy: Strategy,
    #[serde(default = "default_create")]
    pub create: bool,
    pub snippets: Vec<SnippetRef>,
    pub requires: Vec<String>,
    pub purpose: Vec<String>,
}

impl LeafTask {
    /// How this task's document is written to its target.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            format: self.format,
            strategy: self.strategy,
            create: self.create,
        }
    }
}

/// A task that groups other tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeTask {
    pub description: String,
    pub tasks: Vec<String>,
}

/// A validated task definition as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskDefinition {
    Leaf(LeafTask),
    Composite(CompositeTask),
}

/// A leaf task with its target resolved and its fragments merged.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLeaf {
    pub name: TaskName,
    pub task: LeafTask,
    /// The merged document to write.
    pub to_write: Value,
}

/// Result of [`TaskStore::load_task`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedTask {
    Leaf(LoadedLeaf),
    Composite(CompositeTask),
}

/// Read access to a library's task groups.
#[derive(Debug, Clone)]
pub struct TaskStore {
    task_dir: PathBuf,
}

impl TaskStore {
    pub fn new(task_dir: impl Into<PathBuf>) -> Self {
        Self {
            task_dir: task_dir.into(),
        }
    }

    pub fn task_dir(&self) -> &Path {
        &self.task_dir
    }

    /// File holding the definition of `name`.
    pub fn task_path(&self, name: &TaskName) -> PathBuf {
        self.task_dir
            .join(&name.group)
            .join(format!("{}.json", name.id))
    }

    /// Fragment directory of `group`.
    pub fn snippet_dir(&self, group: &str) -> PathBuf {
        self.task_dir.join(group).join("snippets")
    }

    /// Read and validate the definition of `name`.
    pub fn read_definition(&self, name: &TaskName) -> Result<TaskDefinition> {
        let path = self.task_path(name);
        if !path.is_file() {
            return Err(Error::BadTaskName {
                name: name.to_string(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        let raw: Value = serde_json::from_str(&content).map_err(|e| Error::Validation {
            task: name.to_string(),
            message: format!("not valid JSON: {}", e),
        })?;
        validate_task(name, raw)
    }

    /// Load `name` for application.
    ///
    /// For a leaf, the target and every fragment's local variables are
    /// resolved strictly against `variables`, then the fragments are merged
    /// in declared order under `policy`. Fragments keep any reference their
    /// local variables do not bind. Composites are returned unchanged.
    pub fn load_task(
        &self,
        name: &TaskName,
        variables: &VariableMap,
        policy: &MergePolicy,
    ) -> Result<LoadedTask> {
        debug!("Loading task {}", name);
        let leaf = match self.read_definition(name)? {
            TaskDefinition::Composite(composite) => return Ok(LoadedTask::Composite(composite)),
            TaskDefinition::Leaf(leaf) => leaf,
        };

        let target = populate_str(&leaf.target, variables)?;
        let snippet_dir = self.snippet_dir(&name.group);
        let fragments = leaf
            .snippets
            .iter()
            .map(|snippet| {
                let local = match snippet.variables() {
                    Some(local) => {
                        match populate_strict(&Value::Object(local.clone()), variables)?
                            .into_value()
                        {
                            Value::Object(map) => map,
                            _ => VariableMap::new(),
                        }
                    }
                    None => VariableMap::new(),
                };
                load_snippet(&snippet_dir, snippet.name(), leaf.format, &local)
                    .map(|fragment| fragment.into_value())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LoadedTask::Leaf(LoadedLeaf {
            name: name.clone(),
            to_write: merge_all(fragments, policy),
            task: LeafTask { target, ..leaf },
        }))
    }
}
