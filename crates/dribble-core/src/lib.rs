pub mod config;
pub mod logging;

pub mod cache;
pub mod catalog;
pub mod idle_timer;
pub mod notifier;
pub mod scheduler;
pub mod sequencer;
pub mod transport;

pub use scheduler::{spawn, ActivityHandle, Collaborators, PrefetchReport, Prefetcher};
