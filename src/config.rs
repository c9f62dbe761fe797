//! # Project Configuration
//!
//! A project opts into one or more template libraries with a `.confsmith.yaml`
//! file (`.confsmith.yml` and `.confsmith.json` are accepted too) in its root.
//! The file is an ordered mapping from library name to library settings:
//!
//! ```yaml
//! shared-templates:
//!   path: ../templates          # library root, relative to the project root
//!   tasks: [editor/@default]    # public tasks to apply
//!   variables:                  # bindings for ${...} references
//!     projectName: demo
//!   exclude: [.editorconfig]    # resolved targets to leave alone
//!   array-merge: append         # append | replace | append-unique
//! ```
//!
//! Libraries are applied in the order they are declared. Unknown keys are
//! rejected, and every problem is reported as [`Error::ConfigParse`] with a
//! hint where one helps.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merge::{ArrayMergeMode, MergePolicy};
use crate::vars::VariableMap;

/// Config file names probed in a project root, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = [".confsmith.yaml", ".confsmith.yml", ".confsmith.json"];

static TOP_LEVEL_TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/@]+/@[^/@]+$").expect("task name pattern is valid"));

/// Settings for one library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LibraryConfig {
    /// Library root holding the task groups.
    pub path: PathBuf,
    /// Public tasks to apply, `<group>/@<name>`.
    pub tasks: Vec<String>,
    #[serde(default)]
    pub variables: VariableMap,
    /// Resolved target paths that are never written.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// How arrays from different fragments are combined.
    #[serde(default)]
    pub array_merge: ArrayMergeMode,
}

impl LibraryConfig {
    /// Fragment merge policy for this library.
    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy::with_arrays(self.array_merge)
    }

    /// Library root resolved against `project_root`.
    pub fn task_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.path)
    }
}

/// A parsed project configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Libraries in declaration order.
    pub libraries: Vec<(String, LibraryConfig)>,
}

/// Parse configuration content.
pub fn parse(content: &str) -> Result<Config> {
    let root: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    let serde_yaml::Value::Mapping(entries) = root else {
        return Err(Error::ConfigParse {
            message: "Expected a mapping of library names to library settings".to_string(),
            hint: Some("Start the file with `<library-name>:` followed by its settings".to_string()),
        });
    };

    let mut config = Config::default();
    for (key, value) in entries {
        let name = key.as_str().map(str::to_string).ok_or_else(|| Error::ConfigParse {
            message: format!("Library names must be strings, found {:?}", key),
            hint: None,
        })?;
        let library: LibraryConfig =
            serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
                message: format!("Library {}: {}", name, e),
                hint: Some(
                    "Library settings are path, tasks, variables, exclude and array-merge"
                        .to_string(),
                ),
            })?;
        check_library(&name, &library)?;
        config.libraries.push((name, library));
    }
    Ok(config)
}

fn check_library(name: &str, library: &LibraryConfig) -> Result<()> {
    if let Some(task) = library.tasks.iter().find(|task| !TOP_LEVEL_TASK.is_match(task)) {
        return Err(Error::ConfigParse {
            message: format!("Library {}: invalid task name {}", name, task),
            hint: Some("Top-level tasks look like <group>/@<name>".to_string()),
        });
    }
    for (index, excluded) in library.exclude.iter().enumerate() {
        if library.exclude[..index].contains(excluded) {
            return Err(Error::ConfigParse {
                message: format!("Library {}: duplicate exclude entry {}", name, excluded),
                hint: Some("Each excluded target only needs to be listed once".to_string()),
            });
        }
    }
    Ok(())
}

/// Parse the configuration file at `path`.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Locate the configuration file of the project at `project_root`.
pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}
