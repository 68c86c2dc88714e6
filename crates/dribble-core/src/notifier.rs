//! Activity notifier: classifies request completions and drives the idle
//! timer and the sequencer.
//!
//! Every request the host makes ends up in `on_request_completed`. A location
//! the sequencer dispatched is an expected completion and continues the drain
//! right away without waiting for another idle period. Anything else is
//! foreground activity and restarts the idle countdown.

use crate::idle_timer::{IdleTimer, TimerDriver};
use crate::sequencer::{Completion, DownloadSequencer, Step};

/// How a request completion was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// Prefetching is finished; nothing to coordinate.
    Ignored,
    /// Foreground request; the idle timer was restarted.
    Deferred,
    /// Expected prefetch completion, forwarded to the sequencer.
    Continued(Completion),
}

pub struct ActivityNotifier<D> {
    sequencer: DownloadSequencer,
    timer: IdleTimer<D>,
    activated: bool,
}

impl<D: TimerDriver> ActivityNotifier<D> {
    pub fn new(sequencer: DownloadSequencer, timer: IdleTimer<D>) -> Self {
        Self {
            sequencer,
            timer,
            activated: false,
        }
    }

    /// Start the activation cycle by arming the idle timer. Only the first call counts.
    pub fn activate(&mut self) {
        if self.activated {
            tracing::debug!("prefetcher already activated");
            return;
        }
        self.activated = true;
        tracing::info!("prefetcher activated");
        self.timer.arm(&self.sequencer);
    }

    pub fn on_request_completed(&mut self, location: &str) -> Activity {
        if self.sequencer.is_complete() {
            return Activity::Ignored;
        }

        if !self.sequencer.is_tracked(location) {
            tracing::trace!(location = %location, "foreground activity; deferring prefetch");
            self.timer.arm(&self.sequencer);
            return Activity::Deferred;
        }

        let completion = self.sequencer.on_completion(location);
        self.disarm_if_drained();
        Activity::Continued(completion)
    }

    /// Idle callback from the timer driver. Returns the sequencer step when the
    /// generation was live, None for a stale callback.
    pub fn on_idle_elapsed(&mut self, generation: u64) -> Option<Step> {
        if !self.timer.fire(generation) {
            return None;
        }
        tracing::debug!("host idle; advancing prefetch");
        let step = self.sequencer.advance();
        self.disarm_if_drained();
        Some(step)
    }

    fn disarm_if_drained(&mut self) {
        if self.sequencer.is_complete() {
            self.timer.disarm();
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    pub fn sequencer(&self) -> &DownloadSequencer {
        &self.sequencer
    }

    pub fn timer(&self) -> &IdleTimer<D> {
        &self.timer
    }
}
