use anyhow::{Result, bail};
use cppcheck_runner_core::{
    AnalyzerCommand, ExecutableSettings, ProcessRunner, RunOutcome, validate,
};
use std::io;
use std::path::Path;
use tracing::{debug, info};

use crate::display::{print_command_breakdown, print_findings};
use crate::utils::{ctrlc_cancel_flag, load_config, resolve_workspace};

pub fn run_command(
    config_path: Option<&Path>,
    workspace: Option<&Path>,
    exe: Option<&str>,
    env: Vec<(String, String)>,
    dry_run: bool,
) -> Result<()> {
    let workspace = resolve_workspace(workspace)?;
    let config = load_config(config_path, &workspace)?;

    debug!("Running in workspace: {}", workspace.display());

    let report = validate(&config.analysis);
    print_findings(&report);
    if !report.is_ok() {
        bail!(
            "Configuration has {} error(s), not running cppcheck",
            report.errors().count()
        );
    }

    let executable = match exe {
        Some(path) => ExecutableSettings::explicit(path),
        None => config.executable.clone(),
    };
    let command = AnalyzerCommand::from_config(&executable, &config.analysis).with_envs(env);

    if dry_run {
        print_command_breakdown(&command, &workspace);
        return Ok(());
    }

    info!("Running: {}", command.to_shell_command());

    let runner = ProcessRunner::new().with_cancel(ctrlc_cancel_flag()?);

    // Standard output of the analyzer is the build log
    let mut log = io::stdout();
    match runner.perform(&command, &workspace, &mut log) {
        RunOutcome::Terminated { exit_code } => {
            info!(
                "cppcheck finished with exit code {:?}, results in {}",
                exit_code,
                command.diagnostic_path(&workspace).display()
            );
        }
        RunOutcome::Failed { reason } => {
            debug!("Run failed and was reported: {}", reason);
        }
    }

    Ok(())
}
