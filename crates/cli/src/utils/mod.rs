pub mod cancel;
pub mod workspace;

pub use cancel::ctrlc_cancel_flag;
pub use workspace::{load_config, resolve_workspace};
