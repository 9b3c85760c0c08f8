use anyhow::{Result, bail};
use cppcheck_runner_core::validate;
use std::path::Path;

use crate::display::print_findings;
use crate::utils::{load_config, resolve_workspace};

pub fn validate_command(config_path: Option<&Path>) -> Result<()> {
    let cwd = resolve_workspace(None)?;
    let config = load_config(config_path, &cwd)?;

    let report = validate(&config.analysis);
    print_findings(&report);

    if !report.is_ok() {
        bail!("Configuration has {} error(s)", report.errors().count());
    }

    println!("✅ Configuration is valid");
    Ok(())
}
