//! Prefetch scheduler.
//!
//! Wires the sequencer, idle timer and activity notifier into one tokio task
//! that owns all mutable state and processes events strictly in order:
//! request completions from the host, idle-timer callbacks, and shutdown.
//! Fetches run on the blocking pool and report back through the same channel,
//! so nothing in the core needs a lock.

mod handle;
mod report;
mod run;

pub use handle::{ActivityHandle, Event};
pub use report::PrefetchReport;
pub use run::{spawn, Collaborators, Prefetcher};
