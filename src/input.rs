//! Trigger polling.

use std::time::Duration;

use tracing::{debug, trace};

use crate::device::{DeviceContext, TriggerEvent};
use crate::error::Result;

/// Bounded-wait trigger poller.
///
/// No debouncing: every falling edge the trigger source reports is passed
/// through.
#[derive(Debug, Default)]
pub struct InputMonitor {
    polls: u64,
    edges: u64,
}

impl InputMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait up to `timeout` for a snap or exit edge.
    ///
    /// # Errors
    ///
    /// `Interrupted` if the operator interrupted the run before or during the
    /// poll, or whatever the trigger source reports.
    pub fn wait_for_trigger(
        &mut self,
        ctx: &mut DeviceContext,
        timeout: Duration,
    ) -> Result<Option<TriggerEvent>> {
        ctx.interrupt.check()?;
        self.polls += 1;

        let event = ctx.trigger.wait_for_edge(timeout)?;
        ctx.interrupt.check()?;

        match &event {
            Some(event) => {
                self.edges += 1;
                debug!(line = ?event.line, waited_ms = event.waited_ms, "Trigger");
            }
            None => trace!(poll = self.polls, "Poll timed out"),
        }
        Ok(event)
    }

    /// Drop trigger input that queued up while the booth was busy.
    ///
    /// Presses made during a session must not start the next one.
    pub fn discard_pending(&mut self, ctx: &mut DeviceContext) -> Result<()> {
        ctx.trigger.discard_pending()?;
        trace!("Pending trigger input discarded");
        Ok(())
    }

    /// Polls issued so far.
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    /// Edges received so far.
    pub const fn edges(&self) -> u64 {
        self.edges
    }
}
