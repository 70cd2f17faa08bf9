//! Progress tracking for batch counting.
//!
//! Rows of a batch finish in any order when counted in parallel, so the
//! tracker only reports how many are done, never which.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::counter::KmerCounter;
//!
//! let seqs: Vec<&[u8]> = vec![b"ACGT", b"GATTACA"];
//! let matrix = KmerCounter::new(MolType::Dna)
//!     .k(2)?
//!     .count_many_with_progress(&seqs, |progress| {
//!         eprintln!(
//!             "{}/{} sequences ({} symbols)",
//!             progress.sequences_counted,
//!             progress.total_sequences,
//!             progress.symbols_scanned
//!         );
//!     })?;
//! assert_eq!(matrix.n_rows(), 2);
//! # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot during batch counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Rows whose counts are complete.
    pub sequences_counted: u64,
    /// Sum of the lengths of those rows' sequences.
    pub symbols_scanned: u64,
    /// Rows in the batch.
    pub total_sequences: u64,
}

impl Progress {
    /// Fraction of rows done, in `0.0..=1.0`. An empty batch is complete.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total_sequences == 0 {
            1.0
        } else {
            self.sequences_counted as f64 / self.total_sequences as f64
        }
    }
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    sequences: AtomicU64,
    symbols: AtomicU64,
    total: u64,
}

impl ProgressTracker {
    /// Create a tracker for a batch of `total` sequences.
    #[must_use]
    pub const fn new(total: u64) -> Self {
        Self {
            sequences: AtomicU64::new(0),
            symbols: AtomicU64::new(0),
            total,
        }
    }

    /// Record that a row of `symbols` length has been counted and return
    /// the progress including it.
    pub fn record_sequence(&self, symbols: u64) -> Progress {
        let sequences = self.sequences.fetch_add(1, Ordering::Relaxed) + 1;
        let symbols = self.symbols.fetch_add(symbols, Ordering::Relaxed) + symbols;
        Progress {
            sequences_counted: sequences,
            symbols_scanned: symbols,
            total_sequences: self.total,
        }
    }

    /// Get a snapshot of the current progress.
    ///
    /// Other threads may record rows between the two loads, so the pair is
    /// only approximately consistent while a batch is running.
    pub fn snapshot(&self) -> Progress {
        Progress {
            sequences_counted: self.sequences.load(Ordering::Relaxed),
            symbols_scanned: self.symbols.load(Ordering::Relaxed),
            total_sequences: self.total,
        }
    }

    /// Reset the counters to zero. The batch size is kept.
    pub fn reset(&self) {
        self.sequences.store(0, Ordering::Relaxed);
        self.symbols.store(0, Ordering::Relaxed);
    }
}
