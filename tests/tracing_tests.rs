//! Tests for tracing instrumentation.
//!
//! These tests verify that tracing spans and events are emitted when the
//! tracing feature is enabled.

#![cfg(feature = "tracing")]

use pkt_count_kmers::alphabet::MolType;
use pkt_count_kmers::batch::CancelToken;
use pkt_count_kmers::counter::KmerCounter;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A simple layer that counts events at or above a level.
struct EventCounter {
    level: Level,
    count: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if event.metadata().level() <= &self.level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// A layer that records the names of spans as they are created.
struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0.lock().unwrap().push(attrs.metadata().name());
    }
}

#[test]
fn count_file_emits_info_events() {
    let event_count = Arc::new(AtomicUsize::new(0));
    let layer = EventCounter {
        level: Level::INFO,
        count: Arc::clone(&event_count),
    };
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        KmerCounter::new(MolType::Dna)
            .k(3)
            .unwrap()
            .count_file(fixture_path("simple.fa"))
            .expect("should count k-mers");
    });

    assert!(
        event_count.load(Ordering::SeqCst) > 0,
        "should emit tracing events"
    );
}

#[test]
fn count_file_opens_read_and_batch_spans() {
    let names = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(SpanNames(Arc::clone(&names)));

    tracing::subscriber::with_default(subscriber, || {
        KmerCounter::new(MolType::Dna)
            .k(2)
            .unwrap()
            .count_file(fixture_path("simple.fq"))
            .expect("should count k-mers");
    });

    let names = names.lock().unwrap();
    assert!(names.contains(&"read_sequences"), "spans: {names:?}");
    assert!(names.contains(&"count_many"), "spans: {names:?}");
}

#[test]
fn cancelled_batch_is_logged() {
    let event_count = Arc::new(AtomicUsize::new(0));
    let layer = EventCounter {
        level: Level::INFO,
        count: Arc::clone(&event_count),
    };
    let subscriber = tracing_subscriber::registry().with(layer);

    let token = CancelToken::new();
    token.cancel();

    tracing::subscriber::with_default(subscriber, || {
        let result = KmerCounter::new(MolType::Dna)
            .k(2)
            .unwrap()
            .count_many_cancellable(&["ACGT", "GGCC"], &token);
        assert!(result.is_err());
    });

    assert!(event_count.load(Ordering::SeqCst) > 0);
}
