//! Tests for progress reporting and cancellation during batch counting.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pkt_count_kmers::alphabet::MolType;
use pkt_count_kmers::batch::{
    count_many_cancellable, count_many_with_progress, CancelToken, Execution,
};
use pkt_count_kmers::counter::KmerCounter;
use pkt_count_kmers::error::{ErrorKind, KmerCountError};
use pkt_count_kmers::progress::Progress;
use pkt_count_kmers::strategy::RollingIndex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

fn sequences() -> Vec<String> {
    (0..50).map(|i| "ACGT".repeat(i + 1)).collect()
}

#[test]
fn callback_runs_once_per_row() {
    for execution in [Execution::Serial, Execution::Parallel] {
        let seqs = sequences();
        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&calls);

        let matrix = count_many_with_progress(
            &RollingIndex,
            &MolType::Dna.alphabet(),
            &seqs,
            3,
            execution,
            move |_progress| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        )
        .expect("should count");

        assert_eq!(matrix.n_rows(), 50);
        assert_eq!(calls.load(Ordering::SeqCst), 50);
    }
}

#[test]
fn final_progress_covers_every_symbol() {
    let seqs = sequences();
    let total_symbols: u64 = seqs.iter().map(|s| s.len() as u64).sum();
    let last = Arc::new(Mutex::new(Progress::default()));
    let sink = Arc::clone(&last);

    KmerCounter::new(MolType::Dna)
        .k(2)
        .unwrap()
        .execution(Execution::Serial)
        .count_many_with_progress(&seqs, move |progress| {
            *sink.lock().unwrap() = progress;
        })
        .expect("should count");

    let last = last.lock().unwrap().clone();
    assert_eq!(last.sequences_counted, 50);
    assert_eq!(last.total_sequences, 50);
    assert_eq!(last.symbols_scanned, total_symbols);
    assert!((last.fraction() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn serial_progress_is_monotonic() {
    let seqs = sequences();
    let history = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&history);

    KmerCounter::new(MolType::Dna)
        .k(2)
        .unwrap()
        .execution(Execution::Serial)
        .count_many_with_progress(&seqs, move |progress| {
            sink.lock().unwrap().push(progress.sequences_counted);
        })
        .unwrap();

    let history = history.lock().unwrap();
    assert_eq!(*history, (1..=50).collect::<Vec<u64>>());
}

#[test]
fn cancelled_before_start() {
    let token = CancelToken::new();
    token.cancel();

    let err = count_many_cancellable(
        &RollingIndex,
        &MolType::Dna.alphabet(),
        &sequences(),
        3,
        Execution::Parallel,
        &token,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(matches!(err, KmerCountError::Cancelled { total: 50, .. }));
}

#[test]
fn uncancelled_token_is_a_no_op() {
    let token = CancelToken::new();
    let counter = KmerCounter::new(MolType::Dna).k(3).unwrap();
    let seqs = sequences();

    let matrix = counter.count_many_cancellable(&seqs, &token).unwrap();
    assert_eq!(matrix, counter.count_many(&seqs).unwrap());
    assert!(!token.is_cancelled());
}

#[test]
fn cancel_from_another_thread() {
    let token = CancelToken::new();
    let trigger = token.clone();
    let alphabet = MolType::Dna.alphabet();
    let seqs = sequences();

    let result = std::thread::scope(|scope| {
        let handle = scope.spawn(|| {
            count_many_cancellable(&RollingIndex, &alphabet, &seqs, 2, Execution::Serial, &token)
        });
        trigger.cancel();
        handle.join().unwrap()
    });

    // the batch either finished before the cancel or stopped early
    match result {
        Ok(matrix) => assert_eq!(matrix.n_rows(), 50),
        Err(KmerCountError::Cancelled { completed, total }) => {
            assert!(completed < total);
            assert_eq!(total, 50);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}
