pub mod command_breakdown;
pub mod findings;

pub use command_breakdown::print_command_breakdown;
pub use findings::{format_finding, print_findings};
