use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{init_command, preview_command, run_command, validate_command};

#[derive(Parser, Debug)]
#[command(name = "cppcheck-runner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run cppcheck in a workspace
    #[command(visible_alias = "r")]
    Run {
        /// Configuration file (defaults to the nearest .cppcheck-runner.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Workspace root the analyzer runs in (defaults to current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Explicit cppcheck executable, overriding the configuration
        #[arg(long)]
        exe: Option<String>,

        /// Extra environment for the analyzer (KEY=VALUE, repeatable)
        #[arg(short, long = "env", value_parser = parse_env_var)]
        env: Vec<(String, String)>,

        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Print the composed cppcheck command line
    #[command(visible_alias = "p")]
    Preview {
        /// Configuration file (defaults to the nearest .cppcheck-runner.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Explicit cppcheck executable, overriding the configuration
        #[arg(long)]
        exe: Option<String>,
    },
    /// Check a configuration for problems
    Validate {
        /// Configuration file (defaults to the nearest .cppcheck-runner.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Initialize cppcheck-runner configuration
    Init {
        /// Specify the current working directory
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,

        /// Write cppcheck-runner.toml instead of JSON
        #[arg(long)]
        toml: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Run {
                config,
                workspace,
                exe,
                env,
                dry_run,
            } => run_command(
                config.as_deref(),
                workspace.as_deref(),
                exe.as_deref(),
                env,
                dry_run,
            ),
            Commands::Preview { config, exe } => preview_command(config.as_deref(), exe.as_deref()),
            Commands::Validate { config } => validate_command(config.as_deref()),
            Commands::Init { cwd, force, toml } => init_command(cwd.as_deref(), force, toml),
        }
    }
}

fn parse_env_var(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(anyhow!("environment variable name is empty in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
