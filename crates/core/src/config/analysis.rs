use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Target analysed when none is configured.
pub const DEFAULT_TARGET: &str = ".";

/// Result file used when the output file is blank and `xml` is set.
pub const DEFAULT_XML_OUTPUT_FILE: &str = "cppcheck-result.xml";

/// Result file used when the output file is blank and `xml` is not set.
pub const DEFAULT_TEXT_OUTPUT_FILE: &str = "cppcheck-result.txt";

/// Additional check categories passed through `--enable=`.
///
/// Declaration order is the order categories appear in the enable-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckCategory {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "style")]
    Style,
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "portability")]
    Portability,
    #[serde(rename = "information")]
    Information,
    #[serde(rename = "unusedFunction")]
    UnusedFunction,
    #[serde(rename = "missingInclude")]
    MissingInclude,
}

impl CheckCategory {
    pub const ALL: [CheckCategory; 8] = [
        CheckCategory::All,
        CheckCategory::Warning,
        CheckCategory::Style,
        CheckCategory::Performance,
        CheckCategory::Portability,
        CheckCategory::Information,
        CheckCategory::UnusedFunction,
        CheckCategory::MissingInclude,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckCategory::All => "all",
            CheckCategory::Warning => "warning",
            CheckCategory::Style => "style",
            CheckCategory::Performance => "performance",
            CheckCategory::Portability => "portability",
            CheckCategory::Information => "information",
            CheckCategory::UnusedFunction => "unusedFunction",
            CheckCategory::MissingInclude => "missingInclude",
        }
    }
}

/// Language standards accepted by `--std=`.
///
/// Several may be selected at once; each is emitted as its own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageStandard {
    #[serde(rename = "posix")]
    Posix,
    #[serde(rename = "c89")]
    C89,
    #[serde(rename = "c99")]
    C99,
    #[serde(rename = "c11")]
    C11,
    #[serde(rename = "c++03", alias = "cpp03")]
    Cpp03,
    #[serde(rename = "c++11", alias = "cpp11")]
    Cpp11,
}

impl LanguageStandard {
    pub const ALL: [LanguageStandard; 6] = [
        LanguageStandard::Posix,
        LanguageStandard::C89,
        LanguageStandard::C99,
        LanguageStandard::C11,
        LanguageStandard::Cpp03,
        LanguageStandard::Cpp11,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageStandard::Posix => "posix",
            LanguageStandard::C89 => "c89",
            LanguageStandard::C99 => "c99",
            LanguageStandard::C11 => "c11",
            LanguageStandard::Cpp03 => "c++03",
            LanguageStandard::Cpp11 => "c++11",
        }
    }
}

/// Warning ids suppressed through `--suppress=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suppression {
    #[serde(rename = "unmatchedSuppression")]
    UnmatchedSuppression,
    #[serde(rename = "unusedFunction")]
    UnusedFunction,
    #[serde(rename = "variableScope")]
    VariableScope,
}

impl Suppression {
    pub const ALL: [Suppression; 3] = [
        Suppression::UnmatchedSuppression,
        Suppression::UnusedFunction,
        Suppression::VariableScope,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Suppression::UnmatchedSuppression => "unmatchedSuppression",
            Suppression::UnusedFunction => "unusedFunction",
            Suppression::VariableScope => "variableScope",
        }
    }
}

/// The analyzer options selected for one build step.
///
/// Built once from persisted settings and only read afterwards. String
/// fields are raw user input; use the accessor methods to get the trimmed
/// values the composer works with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AnalysisConfig {
    /// File (relative to the workspace) that receives the diagnostic stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Path or glob handed to the analyzer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    pub dump: bool,
    /// Preprocessor symbol for `-D`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub enable: BTreeSet<CheckCategory>,

    pub force: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_dir: Option<String>,
    pub inconclusive: bool,
    pub quiet: bool,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub standards: BTreeSet<LanguageStandard>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub suppressions: BTreeSet<Suppression>,

    pub verbose: bool,
    pub xml: bool,
    pub xml_version_2: bool,
}

impl AnalysisConfig {
    /// Trimmed preprocessor symbol, `None` when blank
    pub fn symbol(&self) -> Option<&str> {
        non_blank(self.symbol.as_deref())
    }

    /// Trimmed include directory, `None` when blank
    pub fn include_dir(&self) -> Option<&str> {
        non_blank(self.include_dir.as_deref())
    }

    /// Trimmed target, falling back to the current directory
    pub fn target(&self) -> &str {
        non_blank(self.target.as_deref()).unwrap_or(DEFAULT_TARGET)
    }

    /// Trimmed output file name, falling back to a format-specific default
    pub fn output_file(&self) -> &str {
        match non_blank(self.output_file.as_deref()) {
            Some(file) => file,
            None if self.xml => DEFAULT_XML_OUTPUT_FILE,
            None => DEFAULT_TEXT_OUTPUT_FILE,
        }
    }

    pub fn is_enabled(&self, category: CheckCategory) -> bool {
        self.enable.contains(&category)
    }
}

/// Trim `value`, treating an all-whitespace string as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
