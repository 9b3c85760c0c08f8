//! Runs the analyzer inside a workspace and reports how it went.
//!
//! The diagnostic stream goes to the result file, standard output goes to the
//! build log. Both are drained on scoped threads while the calling thread
//! waits for the child, so neither pipe can fill up and stall the analyzer.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::command::AnalyzerCommand;

pub const START_MARKER: &str = "[Cppchecker] Starting the cppcheck.";
pub const END_MARKER: &str = "[Cppchecker] Ending the cppcheck.";

/// Raised by the caller to stop a run that is waiting on the analyzer.
pub type CancelFlag = Arc<AtomicBool>;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open result file {}", path.display())]
    DiagnosticFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to forward {stream}")]
    Stream {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for {program}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} was interrupted")]
    Interrupted { program: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Terminated,
    Failed,
}

/// What a build step reports after invoking the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The analyzer ran to completion; its exit code is informational only
    Terminated { exit_code: Option<i32> },
    /// The analyzer could not be run; already logged
    Failed { reason: String },
}

impl RunOutcome {
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Terminated { .. } => RunState::Terminated,
            RunOutcome::Failed { .. } => RunState::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunOutcome::Terminated { exit_code } => *exit_code,
            RunOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cancel: Option<CancelFlag>,
    poll_interval: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            cancel: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Watch `flag` while waiting; raising it kills the analyzer.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run `command` in `workspace`, bracketed by start/end markers in `log`.
    ///
    /// Never fails: launch, stream and wait errors are logged and come back
    /// as [`RunOutcome::Failed`]. A non-zero analyzer exit is a normal
    /// [`RunOutcome::Terminated`].
    pub fn perform<W>(
        &self,
        command: &AnalyzerCommand,
        workspace: &Path,
        log: &mut W,
    ) -> RunOutcome
    where
        W: Write + Send,
    {
        write_line(log, START_MARKER);

        let outcome = match self.try_run(command, workspace, &mut *log) {
            Ok(status) => {
                debug!(state = ?RunState::Terminated, "{} finished", command.program);
                if status.success() {
                    info!("{} exited successfully", command.program);
                } else {
                    info!(
                        "{} exited with {status}; not treated as a build failure",
                        command.program
                    );
                }
                RunOutcome::Terminated {
                    exit_code: status.code(),
                }
            }
            Err(err) => {
                let reason = error_chain(&err);
                debug!(state = ?RunState::Failed, "{} failed", command.program);
                error!(
                    program = %command.program,
                    workspace = %workspace.display(),
                    args = ?command.args,
                    "cppcheck run failed: {reason}"
                );
                write_line(log, &format!("[Cppchecker] {reason}"));
                RunOutcome::Failed { reason }
            }
        };

        write_line(log, END_MARKER);
        outcome
    }

    /// Run once and return the raw exit status or the typed failure.
    pub fn try_run<W>(
        &self,
        command: &AnalyzerCommand,
        workspace: &Path,
        log: &mut W,
    ) -> Result<ExitStatus, RunError>
    where
        W: Write + Send,
    {
        debug!(state = ?RunState::NotStarted, "Running: {}", command.to_shell_command());

        let diagnostic_path = command.diagnostic_path(workspace);
        let diagnostics = open_diagnostic_file(&diagnostic_path)?;

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(command.current_dir(workspace))
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        debug!(
            state = ?RunState::Running,
            pid = child.id(),
            "Diagnostics go to {}",
            diagnostic_path.display()
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        thread::scope(|scope| -> Result<ExitStatus, RunError> {
            let stderr_task = scope.spawn(move || {
                let mut diagnostics = diagnostics;
                match stderr {
                    Some(stream) => forward(stream, &mut diagnostics),
                    None => Ok(0),
                }
            });
            let stdout_task = scope.spawn(move || match stdout {
                Some(stream) => forward(stream, log),
                None => Ok(0),
            });

            let status = self.wait(&mut child, &command.program);
            if status.is_err() {
                let _ = child.kill();
                let _ = child.wait();
            }

            let stderr_result = join_forwarder(stderr_task, "diagnostic stream");
            let stdout_result = join_forwarder(stdout_task, "standard output");

            let status = status?;
            let written = stderr_result?;
            stdout_result?;
            debug!("Wrote {written} bytes of diagnostics");
            Ok(status)
        })
    }

    fn wait(&self, child: &mut Child, program: &str) -> Result<ExitStatus, RunError> {
        let wait_error = |source: io::Error| {
            if source.kind() == io::ErrorKind::Interrupted {
                RunError::Interrupted {
                    program: program.to_string(),
                }
            } else {
                RunError::Wait {
                    program: program.to_string(),
                    source,
                }
            }
        };

        let Some(cancel) = &self.cancel else {
            return child.wait().map_err(wait_error);
        };

        loop {
            if cancel.load(Ordering::SeqCst) {
                debug!("Cancellation requested, stopping {program}");
                return Err(RunError::Interrupted {
                    program: program.to_string(),
                });
            }
            match child.try_wait().map_err(wait_error)? {
                Some(status) => return Ok(status),
                None => thread::sleep(self.poll_interval),
            }
        }
    }
}

fn open_diagnostic_file(path: &Path) -> Result<File, RunError> {
    let to_error = |source| RunError::DiagnosticFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    File::create(path).map_err(to_error)
}

/// Copy `reader` into `writer`. On a write error the rest of the stream is
/// still drained so the child never blocks on a full pipe.
fn forward<R: Read, W: Write + ?Sized>(mut reader: R, writer: &mut W) -> io::Result<u64> {
    let result = io::copy(&mut reader, writer).and_then(|n| writer.flush().map(|()| n));
    if result.is_err() {
        let _ = io::copy(&mut reader, &mut io::sink());
    }
    result
}

fn join_forwarder(
    task: thread::ScopedJoinHandle<'_, io::Result<u64>>,
    stream: &'static str,
) -> Result<u64, RunError> {
    task.join()
        .unwrap_or_else(|_| Err(io::Error::other("forwarding thread panicked")))
        .map_err(|source| RunError::Stream { stream, source })
}

fn write_line<W: Write + ?Sized>(log: &mut W, line: &str) {
    if let Err(e) = writeln!(log, "{line}").and_then(|()| log.flush()) {
        tracing::warn!("Failed to write to build log: {e}");
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Writes a shell script standing in for cppcheck.
    fn fake_analyzer(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-cppcheck.sh");
        fs::write(&path, format!("{body}\n")).unwrap();
        path
    }

    /// Runs `script` through `/bin/sh` so the freshly written file is never
    /// exec'd directly.
    fn command(script: &Path, args: &[&str], diagnostic_file: &str) -> AnalyzerCommand {
        let mut all_args = vec![script.to_string_lossy().into_owned()];
        all_args.extend(args.iter().map(|a| a.to_string()));
        AnalyzerCommand::new("/bin/sh", all_args, diagnostic_file)
    }

    #[test]
    fn test_streams_are_routed() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(
            tools.path(),
            r#"echo "Checking $1..."
echo "<error id=\"nullPointer\"/>" >&2"#,
        );

        let mut log = Vec::new();
        let outcome = ProcessRunner::new().perform(
            &command(&analyzer, &["src"], "out.xml"),
            workspace.path(),
            &mut log,
        );

        assert_eq!(outcome, RunOutcome::Terminated { exit_code: Some(0) });
        let log = String::from_utf8(log).unwrap();
        assert_eq!(
            log,
            format!("{START_MARKER}\nChecking src...\n{END_MARKER}\n")
        );
        let diagnostics = fs::read_to_string(workspace.path().join("out.xml")).unwrap();
        assert_eq!(diagnostics, "<error id=\"nullPointer\"/>\n");
    }

    #[test]
    fn test_runs_in_workspace_with_env() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), r#"pwd; echo "$BUILD_TAG""#);

        let mut log = Vec::new();
        let command = command(&analyzer, &[], "out.txt").with_env("BUILD_TAG", "job-42");
        let outcome = ProcessRunner::new().perform(&command, workspace.path(), &mut log);

        assert!(!outcome.is_failed());
        let log = String::from_utf8(log).unwrap();
        let expected_dir = workspace.path().canonicalize().unwrap();
        assert!(log.contains(&expected_dir.display().to_string()), "{log}");
        assert!(log.contains("job-42"));
    }

    #[test]
    fn test_working_dir_overrides_workspace() {
        let workspace = TempDir::new().unwrap();
        let module = workspace.path().join("module");
        fs::create_dir(&module).unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), "pwd; echo done >&2");

        let mut log = Vec::new();
        let command = command(&analyzer, &[], "out.txt").with_working_dir(&module);
        let outcome = ProcessRunner::new().perform(&command, workspace.path(), &mut log);

        assert!(!outcome.is_failed());
        let log = String::from_utf8(log).unwrap();
        let expected_dir = module.canonicalize().unwrap();
        assert!(log.contains(&expected_dir.display().to_string()), "{log}");
        // Results are still collected at the workspace root
        let diagnostics = fs::read_to_string(workspace.path().join("out.txt")).unwrap();
        assert_eq!(diagnostics, "done\n");
        assert!(!module.join("out.txt").exists());
    }

    #[test]
    fn test_non_zero_exit_is_not_a_failure() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), "echo issues >&2; exit 3");

        let mut log = Vec::new();
        let outcome = ProcessRunner::new().perform(
            &command(&analyzer, &[], "out.txt"),
            workspace.path(),
            &mut log,
        );

        assert_eq!(outcome.state(), RunState::Terminated);
        assert_eq!(outcome.exit_code(), Some(3));
    }

    #[test]
    fn test_missing_executable_is_reported() {
        let workspace = TempDir::new().unwrap();
        let missing = workspace.path().join("no-such-cppcheck");

        let missing_command = AnalyzerCommand::new(
            missing.to_string_lossy(),
            vec![".".to_string()],
            "out.txt",
        );

        let mut log = Vec::new();
        let outcome = ProcessRunner::new().perform(&missing_command, workspace.path(), &mut log);

        match &outcome {
            RunOutcome::Failed { reason } => assert!(reason.starts_with("failed to launch")),
            other => panic!("expected failure, got {other:?}"),
        }
        let log = String::from_utf8(log).unwrap();
        assert!(log.starts_with(START_MARKER));
        assert!(log.ends_with(&format!("{END_MARKER}\n")));

        let err = ProcessRunner::new()
            .try_run(&missing_command, workspace.path(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn test_result_file_is_truncated_and_nested() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), "echo fresh >&2");
        let reports = workspace.path().join("reports");
        fs::create_dir_all(&reports).unwrap();
        fs::write(reports.join("cppcheck.txt"), "stale contents from before\n").unwrap();

        let outcome = ProcessRunner::new().perform(
            &command(&analyzer, &[], "reports/cppcheck.txt"),
            workspace.path(),
            &mut io::sink(),
        );

        assert!(!outcome.is_failed());
        assert_eq!(
            fs::read_to_string(reports.join("cppcheck.txt")).unwrap(),
            "fresh\n"
        );
    }

    #[test]
    fn test_large_output_on_both_streams() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        // Well past a pipe buffer on both streams
        let analyzer = fake_analyzer(
            tools.path(),
            r#"i=0
while [ $i -lt 5000 ]; do
  echo "stdout line $i with some padding to fill the pipe"
  echo "stderr line $i with some padding to fill the pipe" >&2
  i=$((i+1))
done"#,
        );

        let mut log = Vec::new();
        let outcome = ProcessRunner::new().perform(
            &command(&analyzer, &[], "out.txt"),
            workspace.path(),
            &mut log,
        );

        assert!(!outcome.is_failed());
        let log = String::from_utf8(log).unwrap();
        assert_eq!(log.lines().count(), 5002);
        let diagnostics = fs::read_to_string(workspace.path().join("out.txt")).unwrap();
        assert_eq!(diagnostics.lines().count(), 5000);
    }

    #[test]
    fn test_cancel_interrupts_the_run() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), "exec sleep 30");

        let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
        let runner = ProcessRunner::new()
            .with_cancel(cancel.clone())
            .with_poll_interval(Duration::from_millis(10));

        let trigger = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                cancel.store(true, Ordering::SeqCst);
            })
        };

        let started = std::time::Instant::now();
        let err = runner
            .try_run(&command(&analyzer, &[], "out.txt"), workspace.path(), &mut Vec::new())
            .unwrap_err();
        trigger.join().unwrap();

        assert!(matches!(err, RunError::Interrupted { .. }));
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[test]
    fn test_unwritable_result_file_fails_before_launch() {
        let workspace = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        let analyzer = fake_analyzer(tools.path(), "touch launched");
        // A directory where the result file should go
        fs::create_dir_all(workspace.path().join("out.txt")).unwrap();

        let err = ProcessRunner::new()
            .try_run(&command(&analyzer, &[], "out.txt"), workspace.path(), &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, RunError::DiagnosticFile { .. }));
        assert!(!workspace.path().join("launched").exists());
    }
}
