use std::path::{Path, PathBuf};

use crate::config::{AnalysisConfig, ExecutableSettings};

use super::composer::compose;

/// A fully resolved cppcheck invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Where the diagnostic stream is written, relative to the workspace
    pub diagnostic_file: String,
    /// Directory the analyzer runs in; the workspace when unset
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl AnalyzerCommand {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        diagnostic_file: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            diagnostic_file: diagnostic_file.into(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    /// Resolve the executable and compose the arguments for `analysis`.
    pub fn from_config(executable: &ExecutableSettings, analysis: &AnalysisConfig) -> Self {
        let composed = compose(analysis);
        Self::new(executable.resolve(), composed.args, composed.diagnostic_file)
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Absolute location of the result file once a workspace is known.
    pub fn diagnostic_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.diagnostic_file)
    }

    /// Where the analyzer process starts.
    pub fn current_dir<'a>(&'a self, workspace: &'a Path) -> &'a Path {
        self.working_dir.as_deref().unwrap_or(workspace)
    }

    /// Shell-style rendering for previews and logs, e.g.
    /// `cppcheck --enable=all src 2>out.xml`.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = quote(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote(arg));
        }
        cmd.push_str(" 2>");
        cmd.push_str(&quote(&self.diagnostic_file));
        cmd
    }
}

/// Single-quote `arg` unless every character is shell-inert.
fn quote(arg: &str) -> String {
    let inert = |c: char| c.is_ascii_alphanumeric() || "-_+=./,:@%".contains(c);
    if !arg.is_empty() && arg.chars().all(inert) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
