//! Shared test utilities for integration and E2E tests.
//!
//! A fixture is a temporary workspace holding a task library under
//! `templates/` and a project under `project/` whose `.confsmith.yaml`
//! refers to `../templates`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_library(libraries::NODE)
//!         .with_config(configs::NODE);
//!     fixture.command().arg("apply").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{configs, libraries};
    pub use super::TestFixture;
}

/// Library layouts as `(relative path, content)` pairs.
#[allow(dead_code)]
pub mod libraries {
    /// A node group: `package.json` built from two snippets and a
    /// `.gitignore` maintained as a unique line list.
    pub const NODE: &[(&str, &str)] = &[
        (
            "node/@default.json",
            r##"{"description": "Node project", "tasks": ["package", "#ignores"]}"##,
        ),
        (
            "node/#ignores.json",
            r#"{"description": "Ignore rules", "tasks": ["gitignore"]}"#,
        ),
        (
            "node/package.json",
            r#"{
  "target": "package.json",
  "strategy": "default",
  "snippets": [
    {"name": "package-base", "variables": {"name": "${projectName}"}},
    "package-scripts"
  ],
  "requires": [],
  "purpose": ["Package manifest"]
}"#,
        ),
        (
            "node/gitignore.json",
            r#"{
  "target": ".gitignore",
  "strategy": "unique-bottom",
  "snippets": ["gitignore"],
  "requires": [],
  "purpose": ["Ignore build output"]
}"#,
        ),
        (
            "node/snippets/package-base.json",
            r#"{"name": "${name}", "private": true, "keywords": ["config"]}"#,
        ),
        (
            "node/snippets/package-scripts.yaml",
            "scripts:\n  build: tsc\nkeywords:\n  - tooling\n",
        ),
        ("node/snippets/gitignore.txt", "node_modules\ndist\n"),
    ];

    /// An editor group whose single target is written only when missing.
    pub const EDITOR: &[(&str, &str)] = &[
        (
            "editor/@default.json",
            r#"{"description": "Editor settings", "tasks": ["editorconfig"]}"#,
        ),
        (
            "editor/editorconfig.json",
            r#"{
  "target": ".editorconfig",
  "format": "ini",
  "strategy": "overwrite",
  "snippets": ["editorconfig"],
  "requires": [],
  "purpose": ["Indentation"]
}"#,
        ),
        (
            "editor/snippets/editorconfig.ini",
            "root = true\n\n[*]\nindent_size = 2\n",
        ),
    ];

    /// A maven group reconciling `pom.xml` structurally.
    pub const MAVEN: &[(&str, &str)] = &[
        (
            "maven/@default.json",
            r#"{"description": "Maven build", "tasks": ["pom"]}"#,
        ),
        (
            "maven/pom.json",
            r#"{
  "target": "pom.xml",
  "strategy": "xml-merge",
  "snippets": ["pom"],
  "requires": [],
  "purpose": ["Managed dependencies"]
}"#,
        ),
        (
            "maven/snippets/pom.xml",
            "<project><dependencies><dependency><artifactId>managed</artifactId></dependency></dependencies></project>\n",
        ),
    ];
}

/// Project configurations referring to `../templates`.
#[allow(dead_code)]
pub mod configs {
    pub const NODE: &str = r#"
shared:
  path: ../templates
  tasks:
    - node/@default
  variables:
    projectName: demo
"#;

    pub const NODE_WITHOUT_VARIABLES: &str = r#"
shared:
  path: ../templates
  tasks:
    - node/@default
"#;

    pub const NODE_EXCLUDING_GITIGNORE: &str = r#"
shared:
  path: ../templates
  tasks:
    - node/@default
  variables:
    projectName: demo
  exclude:
    - .gitignore
"#;

    pub const MAVEN: &str = r#"
shared:
  path: ../templates
  tasks:
    - maven/@default
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: yaml: content:";
}

/// A temporary workspace with a library and a project.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture with empty `templates/` and `project/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("templates")
            .create_dir_all()
            .expect("Failed to create library directory");
        temp_dir
            .child("project")
            .create_dir_all()
            .expect("Failed to create project directory");
        Self { temp_dir }
    }

    /// Add library files.
    pub fn with_library(self, files: &[(&str, &str)]) -> Self {
        for (path, content) in files {
            self.temp_dir
                .child("templates")
                .child(path)
                .write_str(content)
                .expect("Failed to write library file");
        }
        self
    }

    /// Add a `.confsmith.yaml` to the project.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".confsmith.yaml", content)
    }

    /// Add a project file.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("project")
            .child(path)
            .write_str(content)
            .expect("Failed to write project file");
        self
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The library directory.
    pub fn library(&self) -> PathBuf {
        self.temp_dir.path().join("templates")
    }

    /// The project directory.
    pub fn project(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    /// Read a project file.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.project().join(path)).expect("Failed to read project file")
    }

    /// Create a command running in the project directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confsmith");
        cmd.current_dir(self.project()).env_remove("CONFSMITH_CONFIG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let fixture = TestFixture::new();
        assert!(fixture.library().is_dir());
        assert!(fixture.project().is_dir());
    }

    #[test]
    fn test_fixture_with_library() {
        let fixture = TestFixture::new().with_library(libraries::EDITOR);
        assert!(fixture.library().join("editor/@default.json").exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [
            configs::NODE,
            configs::NODE_WITHOUT_VARIABLES,
            configs::NODE_EXCLUDING_GITIGNORE,
            configs::MAVEN,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }
}
