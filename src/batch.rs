//! Counting many sequences into a matrix.
//!
//! Row `i` of a [`CountMatrix`] holds the counts of `sequences[i]`. Rows are
//! independent: under [`Execution::Parallel`] each rayon task writes only its
//! own row slice, so the matrix is bit-identical to the serial result.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::batch::{count_many, Execution};
//! use pkt_count_kmers::strategy::RollingIndex;
//!
//! let seqs = ["AACGTTTCG", "GGGG", ""];
//! let alphabet = MolType::Dna.alphabet();
//! let serial = count_many(&RollingIndex, &alphabet, &seqs, 2, Execution::Serial)?;
//! let parallel = count_many(&RollingIndex, &alphabet, &seqs, 2, Execution::Parallel)?;
//!
//! assert_eq!(serial, parallel);
//! assert_eq!(serial.n_rows(), 3);
//! assert_eq!(serial.n_cols(), 16);
//! assert_eq!(serial.totals(), vec![8, 3, 0]);
//! # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
//! ```

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use rayon::prelude::*;

use crate::{
    alphabet::Alphabet,
    count::KmerCounts,
    error::KmerCountError,
    kmer::{KmerHeader, KmerLength},
    progress::{Progress, ProgressTracker},
    strategy::CountStrategy,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// Upper bound on the cells of one [`CountMatrix`] (2^31, or 16 GiB of counts).
///
/// [`MAX_BINS`](crate::alphabet::MAX_BINS) bounds a single row; this bounds
/// the whole batch.
pub const MAX_MATRIX_CELLS: usize = 1 << 31;

/// How the rows of a batch are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Execution {
    /// One row after another on the calling thread.
    Serial,
    /// Rows spread over the rayon thread pool.
    #[default]
    Parallel,
}

/// Cooperative cancellation flag shared between a caller and a running batch.
///
/// Clones share the flag. The batch checks it before starting each row, so
/// rows already in progress finish and cancellation takes effect at the
/// next row boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Row-major `n_rows x A^k` matrix of k-mer counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    header: KmerHeader,
    n_rows: usize,
    data: Vec<u64>,
}

impl CountMatrix {
    pub const fn header(&self) -> &KmerHeader {
        &self.header
    }

    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns, `A^k`.
    pub const fn n_cols(&self) -> usize {
        self.header.len()
    }

    /// Counts of row `i`, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&[u64]> {
        let n_cols = self.n_cols();
        self.data.get(i * n_cols..(i + 1) * n_cols)
    }

    /// Iterates rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.data.chunks_exact(self.n_cols())
    }

    /// Row `i` as standalone [`KmerCounts`].
    pub fn row_counts(&self, i: usize) -> Option<KmerCounts> {
        self.row(i)
            .map(|row| KmerCounts::new(self.header.clone(), row.to_vec()))
    }

    /// Row `i` re-indexed by k-mer string.
    pub fn row_map(&self, i: usize) -> Option<BTreeMap<String, u64>> {
        self.row(i)
            .map(|row| self.header.iter().zip(row.iter().copied()).collect())
    }

    /// Number of counted windows in each row.
    pub fn totals(&self) -> Vec<u64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// The raw row-major data.
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u64> {
        self.data
    }
}

/// Per-row hooks for progress and cancellation.
#[derive(Default, Clone, Copy)]
pub(crate) struct RowObserver<'a> {
    pub(crate) cancel: Option<&'a CancelToken>,
    pub(crate) tracker: Option<&'a ProgressTracker>,
    pub(crate) callback: Option<&'a (dyn Fn(Progress) + Sync)>,
}

/// Counts every sequence into one row of a [`CountMatrix`].
///
/// # Errors
///
/// Returns [`KmerCountError::InvalidKmerLength`] before any row is counted
/// if `k < 1` or `A^k` exceeds [`MAX_BINS`](crate::alphabet::MAX_BINS), and
/// [`KmerCountError::MatrixTooLarge`] if the whole batch exceeds
/// [`MAX_MATRIX_CELLS`] or cannot be allocated.
pub fn count_many<S, Q>(
    strategy: &S,
    alphabet: &Alphabet,
    sequences: &[Q],
    k: usize,
    execution: Execution,
) -> Result<CountMatrix, KmerCountError>
where
    S: CountStrategy + ?Sized,
    Q: AsRef<[u8]> + Sync,
{
    let header = validated_header(strategy, alphabet, k)?;
    count_matrix(strategy, header, sequences, execution, RowObserver::default())
}

/// Like [`count_many`], calling `callback` after each completed row.
///
/// Under parallel execution the callback runs on worker threads, in the
/// order rows finish.
pub fn count_many_with_progress<S, Q, F>(
    strategy: &S,
    alphabet: &Alphabet,
    sequences: &[Q],
    k: usize,
    execution: Execution,
    callback: F,
) -> Result<CountMatrix, KmerCountError>
where
    S: CountStrategy + ?Sized,
    Q: AsRef<[u8]> + Sync,
    F: Fn(Progress) + Send + Sync,
{
    let header = validated_header(strategy, alphabet, k)?;
    let tracker = ProgressTracker::new(sequences.len() as u64);
    let observer = RowObserver {
        tracker: Some(&tracker),
        callback: Some(&callback),
        ..RowObserver::default()
    };
    count_matrix(strategy, header, sequences, execution, observer)
}

/// Like [`count_many`], stopping at the next row boundary once `token` is
/// cancelled.
///
/// # Errors
///
/// Returns [`KmerCountError::Cancelled`] if the token was cancelled before
/// every row was counted. No partial matrix is returned.
pub fn count_many_cancellable<S, Q>(
    strategy: &S,
    alphabet: &Alphabet,
    sequences: &[Q],
    k: usize,
    execution: Execution,
    token: &CancelToken,
) -> Result<CountMatrix, KmerCountError>
where
    S: CountStrategy + ?Sized,
    Q: AsRef<[u8]> + Sync,
{
    let header = validated_header(strategy, alphabet, k)?;
    let observer = RowObserver {
        cancel: Some(token),
        ..RowObserver::default()
    };
    count_matrix(strategy, header, sequences, execution, observer)
}

fn validated_header<S>(
    strategy: &S,
    alphabet: &Alphabet,
    k: usize,
) -> Result<KmerHeader, KmerCountError>
where
    S: CountStrategy + ?Sized,
{
    let k = KmerLength::new(k)?;
    KmerHeader::new(alphabet.clone(), k, strategy.order())
}

/// Fills a matrix for an already validated header.
pub(crate) fn count_matrix<S, Q>(
    strategy: &S,
    header: KmerHeader,
    sequences: &[Q],
    execution: Execution,
    observer: RowObserver<'_>,
) -> Result<CountMatrix, KmerCountError>
where
    S: CountStrategy + ?Sized,
    Q: AsRef<[u8]> + Sync,
{
    let n_rows = sequences.len();
    let n_cols = header.len();

    #[cfg(feature = "tracing")]
    let _span = info_span!(
        "count_many",
        rows = n_rows,
        k = header.k().get(),
        strategy = strategy.name()
    )
    .entered();

    let mut data = zeroed_matrix(n_rows, n_cols)?;
    let completed = AtomicUsize::new(0);
    let alphabet = header.alphabet();
    let k = header.k();

    let count_row = |(out, seq): (&mut [u64], &Q)| -> Result<(), KmerCountError> {
        if observer.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(KmerCountError::Cancelled {
                completed: completed.load(Ordering::Relaxed),
                total: n_rows,
            });
        }
        let seq = seq.as_ref();
        strategy.count_into(alphabet, seq, k, out);
        completed.fetch_add(1, Ordering::Relaxed);

        if let Some(tracker) = observer.tracker {
            let progress = tracker.record_sequence(seq.len() as u64);
            if let Some(callback) = observer.callback {
                callback(progress);
            }
        }
        Ok(())
    };

    let outcome = match execution {
        Execution::Serial => data.chunks_mut(n_cols).zip(sequences).try_for_each(count_row),
        Execution::Parallel => data
            .par_chunks_mut(n_cols)
            .zip(sequences.par_iter())
            .try_for_each(count_row),
    };

    if let Err(err) = outcome {
        #[cfg(feature = "tracing")]
        info!(%err, "Batch counting stopped");
        return Err(err);
    }

    #[cfg(feature = "tracing")]
    debug!(rows = n_rows, cols = n_cols, "Batch counting complete");

    Ok(CountMatrix {
        header,
        n_rows,
        data,
    })
}

/// Allocates `n_rows x n_cols` zeroed cells, failing instead of aborting.
fn zeroed_matrix(n_rows: usize, n_cols: usize) -> Result<Vec<u64>, KmerCountError> {
    let too_large = || KmerCountError::MatrixTooLarge {
        rows: n_rows,
        cols: n_cols,
    };
    let cells = n_rows
        .checked_mul(n_cols)
        .filter(|&cells| cells <= MAX_MATRIX_CELLS)
        .ok_or_else(too_large)?;

    let mut data = Vec::new();
    data.try_reserve_exact(cells).map_err(|_| too_large())?;
    data.resize(cells, 0);
    Ok(data)
}
