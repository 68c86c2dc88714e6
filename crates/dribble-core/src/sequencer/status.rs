//! Per-location download status, in dispatch order.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    Pending,
    Done,
}

/// Outcome of marking a location done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Pending -> Done.
    Finished,
    /// Was already Done; nothing changed.
    AlreadyDone,
    /// Location was never dispatched.
    Unknown,
}

/// Record of every location popped from the queue during one activation.
/// Entries are added once and never removed; this is what tells expected
/// (prefetch) completions apart from foreground ones.
#[derive(Debug, Clone, Default)]
pub struct DownloadStatus {
    order: Vec<String>,
    states: HashMap<String, TargetStatus>,
    pending: usize,
}

impl DownloadStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly popped location as pending. Returns false (and changes
    /// nothing) if the location was already recorded.
    pub fn begin(&mut self, location: &str) -> bool {
        if self.states.contains_key(location) {
            return false;
        }
        self.order.push(location.to_string());
        self.states.insert(location.to_string(), TargetStatus::Pending);
        self.pending += 1;
        true
    }

    pub fn finish(&mut self, location: &str) -> Transition {
        match self.states.get_mut(location) {
            None => Transition::Unknown,
            Some(TargetStatus::Done) => Transition::AlreadyDone,
            Some(state) => {
                *state = TargetStatus::Done;
                self.pending -= 1;
                Transition::Finished
            }
        }
    }

    pub fn get(&self, location: &str) -> Option<TargetStatus> {
        self.states.get(location).copied()
    }

    pub fn contains(&self, location: &str) -> bool {
        self.states.contains_key(location)
    }

    /// Number of dispatched locations still waiting for their completion.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in the order they were popped from the queue.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetStatus)> + '_ {
        self.order
            .iter()
            .map(move |loc| (loc.as_str(), self.states[loc.as_str()]))
    }
}
