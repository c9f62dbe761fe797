//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use confsmith::output::OutputConfig;

/// confsmith - Compose project configuration from a shared task library
#[derive(Parser, Debug)]
#[command(name = "confsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the .confsmith.yaml configuration to a project
    Apply(commands::apply::ApplyArgs),

    /// Report targets that are out of date, without writing them
    Check(commands::check::CheckArgs),

    /// List the public tasks of a library
    Ls(commands::ls::LsArgs),

    /// Show the variables and targets of library tasks
    Info(commands::info::InfoArgs),

    /// Display the task tree below a library task
    Tree(commands::tree::TreeArgs),

    /// Render every public task of a library into a directory
    Render(commands::render::RenderArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);
        output.install();

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &output),
            Commands::Check(args) => commands::check::execute(args, &output),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::Info(args) => commands::info::execute(args, &output),
            Commands::Tree(args) => commands::tree::execute(args),
            Commands::Render(args) => commands::render::execute(args, &output),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // a logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_flags() {
        let cli = Cli::try_parse_from([
            "confsmith",
            "--color",
            "never",
            "apply",
            "--project",
            "proj",
            "--dry-run",
            "--quiet",
        ])
        .unwrap();
        assert_eq!(cli.color, "never");
        match cli.command {
            Commands::Apply(args) => {
                assert!(args.dry_run);
                assert!(args.quiet);
                assert_eq!(args.project.unwrap().to_str(), Some("proj"));
            }
            other => panic!("Expected apply, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_render_vars() {
        let cli = Cli::try_parse_from([
            "confsmith",
            "render",
            "lib",
            "--output",
            "out",
            "--var",
            "a=1",
            "--var",
            "b=x",
        ])
        .unwrap();
        match cli.command {
            Commands::Render(args) => assert_eq!(args.vars, vec!["a=1", "b=x"]),
            other => panic!("Expected render, got {:?}", other),
        }
    }
}
