//! Completion bus between the host and the scheduler task.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Input to the scheduler task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Some request (prefetch or foreground) for this location completed,
    /// successfully or not.
    RequestCompleted(String),
    /// The idle timer scheduled with this generation elapsed.
    IdleElapsed(u64),
    /// Stop the scheduler before the queue is drained.
    Shutdown,
}

/// Cloneable sender the host calls for every completed request.
///
/// Notifications never fail from the caller's point of view: once the
/// scheduler has finished they are dropped.
#[derive(Debug, Clone)]
pub struct ActivityHandle {
    tx: UnboundedSender<Event>,
}

impl ActivityHandle {
    /// A handle plus the receiving end the scheduler task consumes.
    pub fn channel() -> (Self, UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Report a completed request.
    pub fn notify(&self, location: &str) {
        if self
            .tx
            .send(Event::RequestCompleted(location.to_string()))
            .is_err()
        {
            tracing::trace!(location = %location, "scheduler finished; notification dropped");
        }
    }

    /// Ask the scheduler to stop. In-flight fetches are not cancelled.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Event::Shutdown);
    }

    /// True once the scheduler task has stopped listening.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
