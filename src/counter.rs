//! Builder API for configuring and running k-mer counts.
//!
//! A [`KmerCounter`] binds an alphabet, a k-mer length, a counting strategy
//! and an execution mode, then counts single sequences, batches or whole
//! files with them.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::counter::KmerCounter;
//! use pkt_count_kmers::strategy::Strategy;
//!
//! let counter = KmerCounter::new(MolType::Dna).k(2)?;
//! let rolling = counter.count("AACGTTTCG")?;
//! let tally = counter.clone().strategy(Strategy::Tally).count("AACGTTTCG")?;
//!
//! // Different header orders, same counts per k-mer.
//! assert_eq!(rolling.to_map(), tally.to_map());
//! # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
//! ```

use crate::{
    alphabet::{Alphabet, MolType},
    batch::{count_matrix, CancelToken, CountMatrix, Execution, RowObserver},
    count::{count_for_header, KmerCounts},
    error::KmerCountError,
    input::{Input, SequenceFormat},
    kmer::{KmerHeader, KmerLength},
    output::CountTable,
    progress::{Progress, ProgressTracker},
    reader::read_sequences,
    strategy::{CountStrategy, Strategy},
};

#[cfg(feature = "tracing")]
use tracing::info;

/// A builder for configuring k-mer counting operations.
///
/// Defaults:
/// - alphabet: DNA
/// - `k`: unset (must be set before counting)
/// - strategy: [`Strategy::Rolling`]
/// - execution: [`Execution::Parallel`]
#[derive(Debug, Clone)]
pub struct KmerCounter {
    alphabet: Alphabet,
    k: Option<KmerLength>,
    strategy: Strategy,
    execution: Execution,
}

impl Default for KmerCounter {
    fn default() -> Self {
        Self::new(MolType::default())
    }
}

impl KmerCounter {
    /// Creates a counter for the alphabet of `moltype`.
    #[must_use]
    pub fn new(moltype: MolType) -> Self {
        Self::with_alphabet(moltype.alphabet())
    }

    /// Creates a counter for a custom alphabet.
    #[must_use]
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            k: None,
            strategy: Strategy::default(),
            execution: Execution::default(),
        }
    }

    /// Sets the k-mer length.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCountError::InvalidKmerLength`] if `k < 1` or the
    /// alphabet cannot hold a dense vector for `k`.
    pub fn k(mut self, k: usize) -> Result<Self, KmerCountError> {
        let k = KmerLength::new(k)?;
        self.alphabet.n_bins(k)?;
        self.k = Some(k);
        Ok(self)
    }

    #[must_use]
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Returns the configured k-mer length, if set.
    pub const fn get_k(&self) -> Option<KmerLength> {
        self.k
    }

    pub const fn get_strategy(&self) -> Strategy {
        self.strategy
    }

    pub const fn get_execution(&self) -> Execution {
        self.execution
    }

    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The header that counts from this counter are aligned to.
    pub fn header(&self) -> Result<KmerHeader, KmerCountError> {
        let k = self.k.ok_or(KmerCountError::KmerLengthNotSet)?;
        KmerHeader::new(self.alphabet.clone(), k, self.strategy.order())
    }

    /// Counts the k-mers of one sequence.
    pub fn count<Q: AsRef<[u8]>>(&self, seq: Q) -> Result<KmerCounts, KmerCountError> {
        let header = self.header()?;
        Ok(count_for_header(&self.strategy, &header, seq.as_ref()))
    }

    /// Counts each sequence into one row of a matrix, in input order.
    pub fn count_many<Q>(&self, sequences: &[Q]) -> Result<CountMatrix, KmerCountError>
    where
        Q: AsRef<[u8]> + Sync,
    {
        let header = self.header()?;
        count_matrix(
            &self.strategy,
            header,
            sequences,
            self.execution,
            RowObserver::default(),
        )
    }

    /// Like [`count_many`](Self::count_many), calling `callback` after each row.
    pub fn count_many_with_progress<Q, F>(
        &self,
        sequences: &[Q],
        callback: F,
    ) -> Result<CountMatrix, KmerCountError>
    where
        Q: AsRef<[u8]> + Sync,
        F: Fn(Progress) + Send + Sync,
    {
        let header = self.header()?;
        let tracker = ProgressTracker::new(sequences.len() as u64);
        let observer = RowObserver {
            tracker: Some(&tracker),
            callback: Some(&callback),
            ..RowObserver::default()
        };
        count_matrix(&self.strategy, header, sequences, self.execution, observer)
    }

    /// Like [`count_many`](Self::count_many), stopping once `token` is cancelled.
    pub fn count_many_cancellable<Q>(
        &self,
        sequences: &[Q],
        token: &CancelToken,
    ) -> Result<CountMatrix, KmerCountError>
    where
        Q: AsRef<[u8]> + Sync,
    {
        let header = self.header()?;
        let observer = RowObserver {
            cancel: Some(token),
            ..RowObserver::default()
        };
        count_matrix(&self.strategy, header, sequences, self.execution, observer)
    }

    /// Reads every record of `input` and counts each into one row.
    ///
    /// # Errors
    ///
    /// Returns an error if `k` has not been set, or the input cannot be
    /// read or parsed.
    pub fn count_input(
        &self,
        input: &Input,
        format: SequenceFormat,
    ) -> Result<CountTable, KmerCountError> {
        // Validate before touching the input.
        let header = self.header()?;
        let records = read_sequences(input, format)?;

        #[cfg(feature = "tracing")]
        info!(
            input = %input,
            sequences = records.len(),
            k = header.k().get(),
            strategy = self.strategy.name(),
            "Counting k-mers"
        );

        let (names, seqs): (Vec<_>, Vec<_>) =
            records.into_iter().map(|r| (r.name, r.seq)).unzip();
        let matrix = count_matrix(
            &self.strategy,
            header,
            &seqs,
            self.execution,
            RowObserver::default(),
        )?;
        Ok(CountTable::new(names, matrix))
    }

    /// Shorthand for [`count_input`](Self::count_input) on a file, detecting
    /// the format from its extension.
    pub fn count_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<CountTable, KmerCountError> {
        self.count_input(&Input::from_path(path.as_ref()), SequenceFormat::Auto)
    }
}
