//! Template cache adapter.
//!
//! The sequencer only asks `has` before dispatching a fetch; `store` is called
//! by the fetch dispatcher once the transport returns a body. A missing entry
//! simply means "not cached yet".

use std::collections::HashMap;
use std::sync::RwLock;

pub trait TemplateCache: Send + Sync {
    /// True if `location` is already cached and needs no fetch.
    fn has(&self, location: &str) -> bool;

    /// Store fetched content for `location`, replacing any previous entry.
    fn store(&self, location: &str, content: Vec<u8>);
}

/// Process-local cache keyed by template location.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: &str) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(location)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locations currently cached, sorted.
    pub fn locations(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl TemplateCache for MemoryCache {
    fn has(&self, location: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(location)
    }

    fn store(&self, location: &str, content: Vec<u8>) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(location.to_string(), content);
    }
}
