pub mod init;
pub mod preview;
pub mod run;
pub mod validate;

pub use init::init_command;
pub use preview::preview_command;
pub use run::run_command;
pub use validate::validate_command;
