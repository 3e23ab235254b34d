//! Wall-clock sleeping for timed screens.

use std::time::{Duration, Instant};

use super::Clock;
use crate::error::Result;
use crate::interrupt::InterruptFlag;

/// Longest uninterrupted sleep slice.
const SLICE: Duration = Duration::from_millis(50);

/// Real clock whose sleeps end early on operator interrupt.
pub struct SystemClock {
    interrupt: InterruptFlag,
}

impl SystemClock {
    pub const fn new(interrupt: InterruptFlag) -> Self {
        Self { interrupt }
    }
}

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.interrupt.check()?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            std::thread::sleep(remaining.min(SLICE));
        }
    }
}
