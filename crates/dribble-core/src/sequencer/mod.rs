//! Download sequencer.
//!
//! Owns the prefetch queue and the download status for one activation and
//! walks the state machine `Idle -> Building -> Draining -> Drained`:
//!
//! - the first `advance()` builds the queue from the route source (Building is
//!   transient and never observable from outside);
//! - while draining, `advance()` pops targets until one needs a real fetch,
//!   skipping cached ones, and dispatches exactly that one;
//! - each completion of a dispatched location marks it done and advances again;
//! - once the queue is empty and nothing is pending, the sequencer is drained
//!   and every entry point becomes a no-op.
//!
//! At most one prefetch is in flight: `advance()` does nothing while a
//! dispatched location is still pending.

mod status;

pub use status::{DownloadStatus, TargetStatus, Transition};

use std::collections::VecDeque;
use std::sync::Arc;

use crate::cache::TemplateCache;
use crate::catalog::{self, FetchTarget, RouteSource};
use crate::config::DribbleConfig;
use crate::transport::Dispatcher;

/// Externally visible sequencer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Draining,
    Drained,
}

/// What a call to `advance()` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A fetch was issued for this location.
    Dispatched(String),
    /// A previously dispatched fetch has not completed yet.
    InFlight,
    /// Nothing left to fetch.
    Drained,
}

/// How a completion notification was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Not a location this sequencer dispatched (foreground traffic).
    Unexpected,
    /// A pending prefetch finished; the sequencer advanced.
    Advanced(Step),
    /// Repeated notification for a location already done.
    Duplicate,
}

enum Phase {
    Idle,
    Draining(VecDeque<FetchTarget>),
    Drained,
}

pub struct DownloadSequencer {
    priority_key: Option<String>,
    routes: Arc<dyn RouteSource>,
    cache: Arc<dyn TemplateCache>,
    dispatcher: Box<dyn Dispatcher>,
    phase: Phase,
    status: DownloadStatus,
}

impl DownloadSequencer {
    pub fn new(
        config: &DribbleConfig,
        routes: Arc<dyn RouteSource>,
        cache: Arc<dyn TemplateCache>,
        dispatcher: Box<dyn Dispatcher>,
    ) -> Self {
        Self {
            priority_key: config.priority_key.clone(),
            routes,
            cache,
            dispatcher,
            phase: Phase::Idle,
            status: DownloadStatus::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        match self.phase {
            Phase::Idle => SequencerState::Idle,
            Phase::Draining(_) => SequencerState::Draining,
            Phase::Drained => SequencerState::Drained,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Drained)
    }

    /// True if `location` was popped from the queue during this activation.
    pub fn is_tracked(&self, location: &str) -> bool {
        self.status.contains(location)
    }

    pub fn status(&self) -> &DownloadStatus {
        &self.status
    }

    /// Targets still waiting in the queue (0 before the queue is built).
    pub fn queued(&self) -> usize {
        match &self.phase {
            Phase::Draining(queue) => queue.len(),
            _ => 0,
        }
    }

    fn build_queue(&self) -> VecDeque<FetchTarget> {
        let routes = self.routes.routes();
        let targets = catalog::build(&routes, self.priority_key.as_deref());
        tracing::info!(
            routes = routes.len(),
            targets = targets.len(),
            "built prefetch queue"
        );
        targets.into()
    }

    /// Move the drain forward by at most one fetch.
    pub fn advance(&mut self) -> Step {
        if let Phase::Idle = self.phase {
            self.phase = Phase::Draining(self.build_queue());
        }

        loop {
            let queue = match &mut self.phase {
                Phase::Draining(queue) => queue,
                Phase::Idle | Phase::Drained => return Step::Drained,
            };

            if self.status.pending() > 0 {
                tracing::debug!("prefetch still in flight; not advancing");
                return Step::InFlight;
            }

            let Some(target) = queue.pop_front() else {
                self.phase = Phase::Drained;
                tracing::info!(fetched = self.status.len(), "prefetch queue drained");
                return Step::Drained;
            };

            self.status.begin(&target.location);
            if self.cache.has(&target.location) {
                tracing::debug!(location = %target.location, "already cached; skipping");
                self.status.finish(&target.location);
                continue;
            }

            tracing::debug!(location = %target.location, "dispatching prefetch");
            self.dispatcher.dispatch(&target.location);
            return Step::Dispatched(target.location);
        }
    }

    /// Handle a completion for `location`. Only pending prefetches have an
    /// effect; foreground locations and repeats are reported back unchanged.
    pub fn on_completion(&mut self, location: &str) -> Completion {
        match self.status.finish(location) {
            Transition::Unknown => Completion::Unexpected,
            Transition::AlreadyDone => Completion::Duplicate,
            Transition::Finished => {
                tracing::debug!(location = %location, "prefetch completed");
                Completion::Advanced(self.advance())
            }
        }
    }
}

#[cfg(test)]
mod tests;
