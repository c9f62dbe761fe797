//! # Render Command Implementation
//!
//! Library self-test: applies every public task of a library into an output
//! directory. Variables the library references default to their own name
//! unless bound with `--var`; binding a variable the library never uses is
//! an error.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confsmith::orchestrator::render_library;
use confsmith::output::{update_line, OutputConfig};
use confsmith::storage::DiskStorage;
use confsmith::suggestions;
use confsmith::vars::VariableMap;

use super::{open_library, parse_var};

/// Render every public task of a library into a directory
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Library directory containing task groups
    #[arg(value_name = "LIBRARY_DIR")]
    pub library: PathBuf,

    /// Directory the targets are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Bind a variable, e.g. --var projectName=demo (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,
}

/// Execute the `render` command.
pub fn execute(args: RenderArgs, output: &OutputConfig) -> Result<()> {
    let store = open_library(&args.library)?;
    let variables = args
        .vars
        .iter()
        .map(|binding| parse_var(binding))
        .collect::<Result<VariableMap>>()?;

    std::fs::create_dir_all(&args.output)?;
    let mut storage = DiskStorage::new(&args.output);
    let result =
        render_library(&store, &mut storage, &variables).map_err(suggestions::explain)?;

    for record in &result {
        println!("{}", update_line(output, record));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn library(root: &std::path::Path) {
        fs::create_dir_all(root.join("ts/snippets")).unwrap();
        fs::write(
            root.join("ts/@default.json"),
            r#"{"description": "TypeScript", "tasks": ["tsconfig"]}"#,
        )
        .unwrap();
        fs::write(
            root.join("ts/tsconfig.json"),
            r#"{"target": "tsconfig.json", "strategy": "default", "snippets": [{"name": "tsconfig", "variables": {"out": "${outDir}"}}], "requires": [], "purpose": ["Compiler settings"]}"#,
        )
        .unwrap();
        fs::write(
            root.join("ts/snippets/tsconfig.json"),
            r#"{"compilerOptions": {"outDir": "${out}"}}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_render_with_variable() {
        let temp = TempDir::new().unwrap();
        library(&temp.path().join("lib"));
        let args = RenderArgs {
            library: temp.path().join("lib"),
            output: temp.path().join("out"),
            vars: vec!["outDir=dist".to_string()],
        };
        execute(args, &OutputConfig::without_color()).unwrap();
        let content = fs::read_to_string(temp.path().join("out/tsconfig.json")).unwrap();
        assert!(content.contains("\"outDir\": \"dist\""));
    }

    #[test]
    fn test_render_rejects_unused_variable() {
        let temp = TempDir::new().unwrap();
        library(&temp.path().join("lib"));
        let args = RenderArgs {
            library: temp.path().join("lib"),
            output: temp.path().join("out"),
            vars: vec!["unused=1".to_string()],
        };
        let err = execute(args, &OutputConfig::without_color()).unwrap_err();
        assert!(err.to_string().contains("Unexpected variable(s)"));
    }

    #[test]
    fn test_render_bad_binding() {
        let temp = TempDir::new().unwrap();
        library(&temp.path().join("lib"));
        let args = RenderArgs {
            library: temp.path().join("lib"),
            output: temp.path().join("out"),
            vars: vec!["novalue".to_string()],
        };
        assert!(execute(args, &OutputConfig::without_color()).is_err());
    }
}
