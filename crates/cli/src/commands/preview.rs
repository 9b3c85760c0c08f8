use anyhow::Result;
use cppcheck_runner_core::{AnalyzerCommand, ExecutableSettings};
use std::path::Path;

use crate::utils::{load_config, resolve_workspace};

pub fn preview_command(config_path: Option<&Path>, exe: Option<&str>) -> Result<()> {
    let cwd = resolve_workspace(None)?;
    let config = load_config(config_path, &cwd)?;

    let executable = match exe {
        Some(path) => ExecutableSettings::explicit(path),
        None => config.executable,
    };

    println!(
        "{}",
        AnalyzerCommand::from_config(&executable, &config.analysis).to_shell_command()
    );
    Ok(())
}
