//! Foreground transport wrapper that reports completions to the activity bus.

use super::{FetchError, Transport};
use crate::scheduler::ActivityHandle;

/// Wraps the host's own transport. Every fetch, successful or not, is
/// reported to the bus once it completes, which defers the next prefetch.
pub struct ObservedTransport<T> {
    inner: T,
    bus: ActivityHandle,
}

impl<T: Transport> ObservedTransport<T> {
    pub fn new(inner: T, bus: ActivityHandle) -> Self {
        Self { inner, bus }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for ObservedTransport<T> {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        let result = self.inner.fetch(location);
        self.bus.notify(location);
        result
    }
}
