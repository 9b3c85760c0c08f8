//! Configuration checks run before a config is used.
//!
//! Validation never changes what gets composed: the composer works on any
//! config. Findings are reported so a host can show them next to the form
//! and decide whether to go ahead.

use std::path::{Component, Path};

use super::analysis::{AnalysisConfig, CheckCategory, non_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub level: Level,
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// True when nothing at error level was found
    pub fn is_ok(&self) -> bool {
        !self.findings.iter().any(|f| f.level == Level::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.level == Level::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.level == Level::Warning)
    }

    fn warn(&mut self, field: &'static str, message: impl Into<String>) {
        self.findings.push(Finding {
            level: Level::Warning,
            field,
            message: message.into(),
        });
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.findings.push(Finding {
            level: Level::Error,
            field,
            message: message.into(),
        });
    }
}

pub fn validate(config: &AnalysisConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(file) = non_blank(config.output_file.as_deref()) {
        let path = Path::new(file);
        if path.is_absolute() {
            report.error(
                "output_file",
                format!("'{file}' is absolute; the result file must live inside the workspace"),
            );
        } else if path.components().any(|c| c == Component::ParentDir) {
            report.error(
                "output_file",
                format!("'{file}' points outside the workspace"),
            );
        } else if !names_a_file(file) {
            report.error(
                "output_file",
                format!("'{file}' names a directory, not a result file"),
            );
        }
    }

    if config.xml_version_2 && !config.xml {
        report.warn(
            "xml_version_2",
            "--xml-version=2 is passed without --xml",
        );
    } else if config.xml && !config.xml_version_2 {
        report.warn("xml_version_2", "Please use the new version if you can.");
    }

    if config.standards.len() > 1 {
        let names: Vec<_> = config.standards.iter().map(|s| s.as_str()).collect();
        report.warn(
            "standards",
            format!("several language standards selected: {}", names.join(", ")),
        );
    }

    if config.is_enabled(CheckCategory::All) && config.enable.len() > 1 {
        report.warn(
            "enable",
            "'all' already enables every other check category",
        );
    }

    for finding in &report.findings {
        tracing::debug!("{:?} {}: {}", finding.level, finding.field, finding.message);
    }

    report
}

/// `Path::file_name` skips a trailing `/` or `/.`, so the raw last segment
/// is checked as well.
fn names_a_file(file: &str) -> bool {
    let last = file.rsplit(['/', '\\']).next().unwrap_or(file);
    !matches!(last, "" | ".") && Path::new(file).file_name().is_some()
}
