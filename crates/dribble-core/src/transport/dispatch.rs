//! Fire-and-forget dispatch of prefetch fetches.

use std::sync::Arc;
use tokio::runtime::Handle;

use super::Transport;
use crate::cache::TemplateCache;
use crate::scheduler::ActivityHandle;

/// Issues one fetch for a location and returns immediately. The completion
/// must later arrive on the activity bus, whatever the outcome.
pub trait Dispatcher: Send {
    fn dispatch(&self, location: &str);
}

/// Runs fetches on the tokio blocking pool.
pub struct FetchDispatcher {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn TemplateCache>,
    bus: ActivityHandle,
    runtime: Handle,
}

impl FetchDispatcher {
    /// Must be called from within a tokio runtime; fetches run on its blocking pool.
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<dyn TemplateCache>,
        bus: ActivityHandle,
    ) -> Self {
        Self {
            transport,
            cache,
            bus,
            runtime: Handle::current(),
        }
    }
}

/// Reports the completion when dropped, so a panicking transport still
/// releases the pending location.
struct CompletionGuard {
    bus: ActivityHandle,
    location: String,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::warn!(location = %self.location, "prefetch panicked");
        }
        self.bus.notify(&self.location);
    }
}

impl Dispatcher for FetchDispatcher {
    fn dispatch(&self, location: &str) {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let guard = CompletionGuard {
            bus: self.bus.clone(),
            location: location.to_string(),
        };
        self.runtime.spawn_blocking(move || {
            let location = guard.location.as_str();
            match transport.fetch(location) {
                Ok(body) => {
                    tracing::debug!(location = %location, bytes = body.len(), "prefetched");
                    cache.store(location, body);
                }
                Err(e) => {
                    tracing::warn!(location = %location, "prefetch failed: {}", e);
                }
            }
            drop(guard);
        });
    }
}
