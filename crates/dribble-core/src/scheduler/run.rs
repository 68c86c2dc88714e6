//! Spawning and running the scheduler task.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use super::{ActivityHandle, Event, PrefetchReport};
use crate::cache::TemplateCache;
use crate::catalog::RouteSource;
use crate::config::DribbleConfig;
use crate::idle_timer::{IdleTimer, TokioTimerDriver};
use crate::notifier::ActivityNotifier;
use crate::sequencer::DownloadSequencer;
use crate::transport::{FetchDispatcher, Transport};

/// Everything the scheduler talks to, injected up front.
#[derive(Clone)]
pub struct Collaborators {
    pub routes: Arc<dyn RouteSource>,
    pub cache: Arc<dyn TemplateCache>,
    pub transport: Arc<dyn Transport>,
}

/// A running activation cycle.
pub struct Prefetcher {
    handle: ActivityHandle,
    task: JoinHandle<PrefetchReport>,
}

impl Prefetcher {
    /// Completion bus for the host's requests.
    pub fn handle(&self) -> ActivityHandle {
        self.handle.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the queue is drained (or a shutdown was requested).
    pub async fn join(self) -> Result<PrefetchReport> {
        self.task.await.context("prefetch task join")
    }

    /// Stop after the event currently being processed and return the report.
    pub async fn shutdown(self) -> Result<PrefetchReport> {
        self.handle.shutdown();
        self.join().await
    }
}

/// Activate a prefetcher with the given config and collaborators.
///
/// Must be called from within a tokio runtime. The idle timer is armed
/// immediately; the route source is not read until the first idle period
/// elapses.
pub fn spawn(config: DribbleConfig, collaborators: Collaborators) -> Prefetcher {
    let (handle, events) = ActivityHandle::channel();

    let dispatcher = FetchDispatcher::new(
        collaborators.transport,
        Arc::clone(&collaborators.cache),
        handle.clone(),
    );
    let sequencer = DownloadSequencer::new(
        &config,
        collaborators.routes,
        collaborators.cache,
        Box::new(dispatcher),
    );
    let timer = IdleTimer::new(TokioTimerDriver::new(handle.sender()), config.idle_timeout());
    let notifier = ActivityNotifier::new(sequencer, timer);

    tracing::debug!(
        idle_timeout_ms = config.idle_timeout_ms,
        priority_key = ?config.priority_key,
        "spawning prefetcher"
    );
    let task = tokio::spawn(run(notifier, events));
    Prefetcher { handle, task }
}

async fn run(
    mut notifier: ActivityNotifier<TokioTimerDriver>,
    mut events: UnboundedReceiver<Event>,
) -> PrefetchReport {
    notifier.activate();

    while !notifier.is_complete() {
        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            Event::RequestCompleted(location) => {
                notifier.on_request_completed(&location);
            }
            Event::IdleElapsed(generation) => {
                notifier.on_idle_elapsed(generation);
            }
            Event::Shutdown => {
                tracing::info!("prefetcher shut down before the queue drained");
                break;
            }
        }
    }

    let sequencer = notifier.sequencer();
    PrefetchReport::from_status(sequencer.status(), sequencer.is_complete(), sequencer.queued())
}
