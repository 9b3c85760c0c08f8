//! Ctrl+C cancellation handling.

use anyhow::{Context, Result};
use cppcheck_runner_core::CancelFlag;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static CTRLC_FLAG: OnceLock<CancelFlag> = OnceLock::new();

/// Flag raised on Ctrl+C. The handler is installed on first use and the same
/// flag is returned afterwards.
pub fn ctrlc_cancel_flag() -> Result<CancelFlag> {
    if let Some(flag) = CTRLC_FLAG.get() {
        return Ok(Arc::clone(flag));
    }

    let flag: CancelFlag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        tracing::info!("Cancellation requested (Ctrl+C)");
    })
    .context("Failed to install Ctrl+C handler")?;

    let _ = CTRLC_FLAG.set(Arc::clone(&flag));
    Ok(flag)
}
