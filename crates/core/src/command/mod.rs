//! Analyzer command composition

pub mod analyzer_command;
pub mod composer;

// Re-export commonly used types
pub use analyzer_command::AnalyzerCommand;
pub use composer::{ComposedArgs, compose, enable_list, standard_flags, suppression_flags};
