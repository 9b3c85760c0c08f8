use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::analysis::{AnalysisConfig, non_blank};

/// Executable name used when no explicit path is configured.
pub const DEFAULT_EXECUTABLE: &str = "cppcheck";

/// File names searched by [`Config::find_config_file`], in priority order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".cppcheck-runner.json",
    "cppcheck-runner.json",
    ".cppcheck-runner.toml",
    "cppcheck-runner.toml",
];

/// Which analyzer binary to launch.
///
/// Resolved once when a run starts and passed to the runner explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ExecutableSettings {
    /// Use `cppcheck` from the search path
    pub use_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exe_path: Option<String>,
}

impl Default for ExecutableSettings {
    fn default() -> Self {
        Self {
            use_default: true,
            exe_path: None,
        }
    }
}

impl ExecutableSettings {
    pub fn explicit(path: impl Into<String>) -> Self {
        Self {
            use_default: false,
            exe_path: Some(path.into()),
        }
    }

    /// The program to launch: the configured path when the default is
    /// switched off and a path is given, otherwise the bare `cppcheck`.
    pub fn resolve(&self) -> &str {
        if self.use_default {
            return DEFAULT_EXECUTABLE;
        }
        non_blank(self.exe_path.as_deref()).unwrap_or(DEFAULT_EXECUTABLE)
    }
}

/// Persisted project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub executable: ExecutableSettings,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load from a JSON file, or TOML when the extension is `.toml`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = if is_toml(path) {
            toml::from_str(&contents).map_err(|e| {
                Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
            })?
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
            })?
        };
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a config file.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckCategory, LanguageStandard};
    use tempfile::TempDir;

    #[test]
    fn test_resolve_executable() {
        assert_eq!(ExecutableSettings::default().resolve(), "cppcheck");

        let explicit = ExecutableSettings::explicit(" /opt/cppcheck/bin/cppcheck ");
        assert_eq!(explicit.resolve(), "/opt/cppcheck/bin/cppcheck");

        // An explicit path is ignored while the default is switched on
        let overridden = ExecutableSettings {
            use_default: true,
            exe_path: Some("/opt/cppcheck".to_string()),
        };
        assert_eq!(overridden.resolve(), "cppcheck");

        let blank = ExecutableSettings {
            use_default: false,
            exe_path: Some("  ".to_string()),
        };
        assert_eq!(blank.resolve(), "cppcheck");

        let missing = ExecutableSettings {
            use_default: false,
            exe_path: None,
        };
        assert_eq!(missing.resolve(), "cppcheck");
    }

    #[test]
    fn test_config_json_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cppcheck-runner.json");

        let config = Config {
            executable: ExecutableSettings::explicit("/usr/local/bin/cppcheck"),
            analysis: AnalysisConfig {
                output_file: Some("out.xml".to_string()),
                enable: [CheckCategory::Style, CheckCategory::Warning].into(),
                standards: [LanguageStandard::Cpp11].into(),
                xml: true,
                ..Default::default()
            },
        };

        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cppcheck-runner.toml");
        std::fs::write(
            &path,
            r#"
[executable]
use_default = false
exe_path = "/opt/cppcheck"

[analysis]
target = "src"
enable = ["warning", "all"]
inconclusive = true
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.executable.resolve(), "/opt/cppcheck");
        assert_eq!(config.analysis.target(), "src");
        assert!(config.analysis.inconclusive);
        assert!(config.analysis.is_enabled(CheckCategory::All));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.executable.use_default);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cppcheck-runner.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains(".cppcheck-runner.json"));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join("cppcheck-runner.json"), "{}").unwrap();

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join("cppcheck-runner.json"));

        // Hidden file wins when both exist in the same directory
        std::fs::write(temp_dir.path().join(".cppcheck-runner.json"), "{}").unwrap();
        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(".cppcheck-runner.json"));
    }

    #[test]
    fn test_find_config_file_accepts_toml() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cppcheck-runner.toml"), "").unwrap();

        let found = Config::find_config_file(temp_dir.path()).unwrap();
        assert_eq!(found, temp_dir.path().join("cppcheck-runner.toml"));

        // JSON still takes precedence in the same directory
        std::fs::write(temp_dir.path().join("cppcheck-runner.json"), "{}").unwrap();
        let found = Config::find_config_file(temp_dir.path()).unwrap();
        assert_eq!(found, temp_dir.path().join("cppcheck-runner.json"));
    }
}
