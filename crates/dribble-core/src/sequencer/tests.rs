//! Tests for the download sequencer state machine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{MemoryCache, TemplateCache};
use crate::catalog::{RouteDescriptor, RouteSource, StaticRoutes};
use crate::config::DribbleConfig;
use crate::transport::testing::RecordingDispatcher;

use super::{Completion, DownloadSequencer, SequencerState, Step, TargetStatus};

/// Route source that counts how often it is read.
struct CountingRoutes {
    routes: Vec<RouteDescriptor>,
    reads: AtomicUsize,
}

impl RouteSource for CountingRoutes {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.routes.clone()
    }
}

fn sequencer(
    routes: Vec<RouteDescriptor>,
    cache: Arc<MemoryCache>,
    priority_key: Option<&str>,
) -> (DownloadSequencer, RecordingDispatcher) {
    let config = DribbleConfig {
        priority_key: priority_key.map(str::to_string),
        ..DribbleConfig::default()
    };
    let dispatcher = RecordingDispatcher::default();
    let seq = DownloadSequencer::new(
        &config,
        Arc::new(StaticRoutes(routes)),
        cache,
        Box::new(dispatcher.clone()),
    );
    (seq, dispatcher)
}

fn two_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("/a.html"),
        RouteDescriptor::new("/b.html"),
    ]
}

#[test]
fn starts_idle_and_builds_on_first_advance() {
    let (mut seq, dispatcher) = sequencer(two_routes(), Arc::new(MemoryCache::new()), None);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(!seq.is_complete());

    assert_eq!(seq.advance(), Step::Dispatched("/a.html".to_string()));
    assert_eq!(seq.state(), SequencerState::Draining);
    assert_eq!(seq.queued(), 1);
    assert_eq!(dispatcher.calls(), vec!["/a.html"]);
    assert_eq!(seq.status().get("/a.html"), Some(TargetStatus::Pending));
}

#[test]
fn drains_one_fetch_per_completion() {
    let (mut seq, dispatcher) = sequencer(two_routes(), Arc::new(MemoryCache::new()), None);
    seq.advance();
    assert_eq!(
        seq.on_completion("/a.html"),
        Completion::Advanced(Step::Dispatched("/b.html".to_string()))
    );
    assert!(!seq.is_complete(), "last fetch is still in flight");
    assert_eq!(
        seq.on_completion("/b.html"),
        Completion::Advanced(Step::Drained)
    );
    assert!(seq.is_complete());
    assert_eq!(dispatcher.calls(), vec!["/a.html", "/b.html"]);
    let entries: Vec<_> = seq.status().iter().collect();
    assert_eq!(
        entries,
        vec![("/a.html", TargetStatus::Done), ("/b.html", TargetStatus::Done)]
    );
}

#[test]
fn n_unique_targets_fetch_exactly_once_each() {
    let routes: Vec<_> = (0..20)
        .map(|i| RouteDescriptor::new(format!("/t{}.html", i % 10)))
        .collect();
    let (mut seq, dispatcher) = sequencer(routes, Arc::new(MemoryCache::new()), None);
    let mut step = seq.advance();
    while let Step::Dispatched(location) = step {
        step = match seq.on_completion(&location) {
            Completion::Advanced(next) => next,
            other => panic!("unexpected completion {:?}", other),
        };
    }
    assert!(seq.is_complete());
    let calls = dispatcher.calls();
    assert_eq!(calls.len(), 10);
    let mut unique = calls.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 10);
}

#[test]
fn advance_while_in_flight_does_not_dispatch() {
    let (mut seq, dispatcher) = sequencer(two_routes(), Arc::new(MemoryCache::new()), None);
    seq.advance();
    assert_eq!(seq.advance(), Step::InFlight);
    assert_eq!(seq.advance(), Step::InFlight);
    assert_eq!(dispatcher.calls(), vec!["/a.html"]);
}

#[test]
fn cached_target_is_skipped_but_marked_done() {
    let cache = Arc::new(MemoryCache::new());
    cache.store("/a.html", b"test".to_vec());
    let (mut seq, dispatcher) = sequencer(two_routes(), cache, None);

    assert_eq!(seq.advance(), Step::Dispatched("/b.html".to_string()));
    assert_eq!(dispatcher.calls(), vec!["/b.html"]);
    assert_eq!(seq.status().get("/a.html"), Some(TargetStatus::Done));
    assert!(seq.is_tracked("/a.html"));
}

#[test]
fn all_cached_drains_without_fetching() {
    let cache = Arc::new(MemoryCache::new());
    cache.store("/a.html", Vec::new());
    cache.store("/b.html", Vec::new());
    let (mut seq, dispatcher) = sequencer(two_routes(), cache, None);
    assert_eq!(seq.advance(), Step::Drained);
    assert!(seq.is_complete());
    assert!(dispatcher.calls().is_empty());
    assert_eq!(seq.status().len(), 2);
}

#[test]
fn priority_key_orders_dispatch() {
    let routes = vec![
        RouteDescriptor::new("/a").with("priority", 100),
        RouteDescriptor::new("/b").with("priority", 1),
    ];
    let (mut seq, dispatcher) = sequencer(routes, Arc::new(MemoryCache::new()), Some("priority"));
    seq.advance();
    seq.on_completion("/b");
    seq.on_completion("/a");
    assert_eq!(dispatcher.calls(), vec!["/b", "/a"]);
    assert!(seq.is_complete());
}

#[test]
fn unexpected_completion_has_no_effect() {
    let (mut seq, dispatcher) = sequencer(two_routes(), Arc::new(MemoryCache::new()), None);
    seq.advance();
    assert_eq!(seq.on_completion("/rest/users"), Completion::Unexpected);
    assert_eq!(dispatcher.calls(), vec!["/a.html"]);
    assert!(!seq.is_tracked("/rest/users"));
    // A queued but not yet dispatched location is also unexpected.
    assert_eq!(seq.on_completion("/b.html"), Completion::Unexpected);
    assert_eq!(seq.status().get("/a.html"), Some(TargetStatus::Pending));
}

#[test]
fn repeated_completion_is_idempotent() {
    let routes = vec![
        RouteDescriptor::new("/a.html"),
        RouteDescriptor::new("/b.html"),
        RouteDescriptor::new("/c.html"),
    ];
    let (mut seq, dispatcher) = sequencer(routes, Arc::new(MemoryCache::new()), None);
    seq.advance();
    seq.on_completion("/a.html");
    assert_eq!(seq.on_completion("/a.html"), Completion::Duplicate);
    assert_eq!(dispatcher.calls(), vec!["/a.html", "/b.html"]);
}

#[test]
fn empty_catalog_drains_immediately() {
    let routes = vec![RouteDescriptor::default().with("redirect_to", "/")];
    let (mut seq, dispatcher) = sequencer(routes, Arc::new(MemoryCache::new()), None);
    assert_eq!(seq.advance(), Step::Drained);
    assert!(seq.is_complete());
    assert!(dispatcher.calls().is_empty());
}

#[test]
fn drained_is_terminal() {
    let (mut seq, dispatcher) = sequencer(
        vec![RouteDescriptor::new("/a.html")],
        Arc::new(MemoryCache::new()),
        None,
    );
    seq.advance();
    seq.on_completion("/a.html");
    assert!(seq.is_complete());

    assert_eq!(seq.advance(), Step::Drained);
    assert_eq!(seq.on_completion("/a.html"), Completion::Duplicate);
    assert_eq!(seq.on_completion("/x.html"), Completion::Unexpected);
    assert_eq!(dispatcher.calls(), vec!["/a.html"]);
}

#[test]
fn route_source_is_read_once_per_activation() {
    let routes = Arc::new(CountingRoutes {
        routes: two_routes(),
        reads: AtomicUsize::new(0),
    });
    let dispatcher = RecordingDispatcher::default();
    let mut seq = DownloadSequencer::new(
        &DribbleConfig::default(),
        Arc::clone(&routes) as Arc<dyn RouteSource>,
        Arc::new(MemoryCache::new()),
        Box::new(dispatcher),
    );
    assert_eq!(routes.reads.load(Ordering::SeqCst), 0);
    seq.advance();
    seq.advance();
    seq.on_completion("/a.html");
    seq.on_completion("/b.html");
    seq.advance();
    assert_eq!(routes.reads.load(Ordering::SeqCst), 1);
}
