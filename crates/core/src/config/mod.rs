//! Configuration management for cppcheck-runner

pub mod analysis;
mod settings;
pub mod validation;

// Re-export main types
pub use analysis::{AnalysisConfig, CheckCategory, LanguageStandard, Suppression};
pub use settings::{CONFIG_FILE_NAMES, Config, DEFAULT_EXECUTABLE, ExecutableSettings};
pub use validation::{Finding, Level, ValidationReport, validate};
