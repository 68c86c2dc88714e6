//! Final state of one activation cycle, returned when the scheduler stops.

use crate::sequencer::{DownloadStatus, TargetStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchReport {
    /// Every location popped from the queue, in dispatch order.
    pub entries: Vec<(String, TargetStatus)>,
    /// True if the queue was fully drained (false after an early shutdown).
    pub drained: bool,
    /// Targets that were never popped (non-zero only after an early shutdown).
    pub remaining: usize,
}

impl PrefetchReport {
    pub(crate) fn from_status(status: &DownloadStatus, drained: bool, remaining: usize) -> Self {
        Self {
            entries: status
                .iter()
                .map(|(location, state)| (location.to_string(), state))
                .collect(),
            drained,
            remaining,
        }
    }

    pub fn status_of(&self, location: &str) -> Option<TargetStatus> {
        self.entries
            .iter()
            .find(|(loc, _)| loc == location)
            .map(|(_, state)| *state)
    }

    pub fn done(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, state)| *state == TargetStatus::Done)
            .count()
    }

    pub fn locations(&self) -> Vec<&str> {
        self.entries.iter().map(|(loc, _)| loc.as_str()).collect()
    }
}
