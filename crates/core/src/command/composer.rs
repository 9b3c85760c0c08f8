//! Maps an [`AnalysisConfig`] onto cppcheck's argument grammar.
//!
//! Composition is pure: the same config always yields the same tokens in the
//! same order, and optional values that are blank are simply left out.

use crate::config::{AnalysisConfig, CheckCategory, LanguageStandard, Suppression};

/// Argument tokens plus the file the diagnostic stream goes to.
///
/// The redirection is kept out of `args` because the process is spawned
/// directly, not through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedArgs {
    pub args: Vec<String>,
    /// Trimmed output file, relative to the workspace
    pub diagnostic_file: String,
}

pub fn compose(config: &AnalysisConfig) -> ComposedArgs {
    let mut args = Vec::new();

    if config.dump {
        args.push("--dump".to_string());
    }
    if let Some(symbol) = config.symbol() {
        args.push(format!("-D{symbol}"));
    }
    if let Some(enable) = enable_list(config.enable.iter().copied()) {
        args.push(enable);
    }
    if config.force {
        args.push("-f".to_string());
    }
    if let Some(dir) = config.include_dir() {
        args.push(format!("-I{dir}"));
    }
    if config.inconclusive {
        args.push("--inconclusive".to_string());
    }
    if config.quiet {
        args.push("-q".to_string());
    }
    args.extend(standard_flags(config.standards.iter().copied()));
    args.extend(suppression_flags(config.suppressions.iter().copied()));
    if config.verbose {
        args.push("-v".to_string());
    }
    if config.xml {
        args.push("--xml".to_string());
    }
    // Emitted from its own toggle even without --xml
    if config.xml_version_2 {
        args.push("--xml-version=2".to_string());
    }
    args.push(config.target().to_string());

    let composed = ComposedArgs {
        args,
        diagnostic_file: config.output_file().to_string(),
    };
    tracing::debug!(
        "Composed {} args, diagnostics to {}",
        composed.args.len(),
        composed.diagnostic_file
    );
    composed
}

/// Single `--enable=` token, or `None` when no category is selected.
///
/// Categories are written in their fixed order whatever order they come in.
pub fn enable_list(categories: impl IntoIterator<Item = CheckCategory>) -> Option<String> {
    let mut categories: Vec<_> = categories.into_iter().collect();
    categories.sort();
    categories.dedup();

    if categories.is_empty() {
        return None;
    }

    let names: Vec<_> = categories.iter().map(|c| c.as_str()).collect();
    Some(format!("--enable={}", names.join(",")))
}

/// One `--std=` flag per selected standard, in fixed order.
pub fn standard_flags(standards: impl IntoIterator<Item = LanguageStandard>) -> Vec<String> {
    let mut standards: Vec<_> = standards.into_iter().collect();
    standards.sort();
    standards.dedup();
    standards
        .into_iter()
        .map(|s| format!("--std={}", s.as_str()))
        .collect()
}

/// One `--suppress=` flag per selected suppression, in fixed order.
pub fn suppression_flags(suppressions: impl IntoIterator<Item = Suppression>) -> Vec<String> {
    let mut suppressions: Vec<_> = suppressions.into_iter().collect();
    suppressions.sort();
    suppressions.dedup();
    suppressions
        .into_iter()
        .map(|s| format!("--suppress={}", s.as_str()))
        .collect()
}
