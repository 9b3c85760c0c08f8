//! cppcheck-runner - Compose and run cppcheck invocations for build pipelines
//!
//! This crate provides functionality to:
//! - Turn a structured set of analyzer options into an order-stable argument list
//! - Resolve which cppcheck executable to launch
//! - Run the analyzer inside a workspace, routing its diagnostic stream to a
//!   result file and its standard output to the build log
pub mod command;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Error, Result};

// Re-export main API components
pub use command::{AnalyzerCommand, ComposedArgs, compose};
pub use config::{AnalysisConfig, Config, ExecutableSettings, validate};
pub use runner::{CancelFlag, ProcessRunner, RunError, RunOutcome, RunState};
