use cppcheck_runner_core::config::{Finding, Level, ValidationReport};

pub fn format_finding(finding: &Finding) -> String {
    let marker = match finding.level {
        Level::Error => "❌",
        Level::Warning => "⚠️ ",
    };
    format!("{marker} {}: {}", finding.field, finding.message)
}

/// Print every finding to stderr; warnings are also traced.
pub fn print_findings(report: &ValidationReport) {
    for finding in &report.findings {
        if finding.level == Level::Warning {
            tracing::warn!("{}: {}", finding.field, finding.message);
        }
        eprintln!("{}", format_finding(finding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_finding() {
        let finding = Finding {
            level: Level::Error,
            field: "output_file",
            message: "points outside the workspace".to_string(),
        };
        assert_eq!(
            format_finding(&finding),
            "❌ output_file: points outside the workspace"
        );
    }
}
