//! Operator interrupt (Ctrl-C) detection.
//!
//! The booth loop is single threaded and never awaits anything, so the
//! signal is received on a dedicated listener thread and published through
//! an atomic flag. Sleeps and trigger polls check the flag and unwind with
//! [`BoothError::Interrupted`](crate::error::BoothError::Interrupted).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::error::{BoothError, Result};

/// Shared "interrupt requested" flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run as interrupted.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once the flag is raised.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            Err(BoothError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Raise `flag` when the process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener runtime cannot be built.
pub fn install_ctrl_c_handler(flag: InterruptFlag) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Received SIGINT, finishing up");
                        flag.raise();
                    }
                    Err(err) => warn!(error = %err, "Ctrl-C listener failed"),
                }
            });
        })?;

    debug!("Ctrl-C handler installed");
    Ok(())
}
