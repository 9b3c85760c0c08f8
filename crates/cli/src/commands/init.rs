use anyhow::{Context, Result};
use cppcheck_runner_core::config::{AnalysisConfig, CheckCategory, Config, ExecutableSettings};
use std::path::Path;
use tracing::info;

use crate::utils::resolve_workspace;

pub fn init_command(cwd: Option<&Path>, force: bool, toml: bool) -> Result<()> {
    let project_root = resolve_workspace(cwd)?;

    let file_name = if toml {
        "cppcheck-runner.toml"
    } else {
        ".cppcheck-runner.json"
    };
    let config_path = project_root.join(file_name);

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    default_config()
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    info!("Created config: {}", config_path.display());
    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Preview the command with:");
    println!("   cppcheck-runner preview --config {}", config_path.display());

    Ok(())
}

/// Starting point written by `init`: common checks with XML v2 results.
pub fn default_config() -> Config {
    Config {
        executable: ExecutableSettings::default(),
        analysis: AnalysisConfig {
            output_file: Some("cppcheck-result.xml".to_string()),
            target: Some(".".to_string()),
            enable: [CheckCategory::Warning, CheckCategory::Style].into(),
            inconclusive: true,
            xml: true,
            xml_version_2: true,
            ..Default::default()
        },
    }
}
