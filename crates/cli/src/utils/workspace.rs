use anyhow::{Context, Result};
use cppcheck_runner_core::Config;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Canonical workspace root, defaulting to the current directory.
pub fn resolve_workspace(workspace: Option<&Path>) -> Result<PathBuf> {
    let root = match workspace {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    root.canonicalize()
        .with_context(|| format!("Failed to canonicalize workspace {}", root.display()))
}

/// Load the explicit config file, or the nearest one above `search_from`.
///
/// Falls back to the default configuration when no file is found.
pub fn load_config(explicit: Option<&Path>, search_from: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::find_config_file(search_from),
    };

    match path {
        Some(path) => {
            debug!("Using config file: {}", path.display());
            Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            info!(
                "No config file found from {}, using defaults",
                search_from.display()
            );
            Ok(Config::default())
        }
    }
}
