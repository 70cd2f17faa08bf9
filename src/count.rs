//! Counting the k-mers of a single sequence.
//!
//! The result is a dense vector with one bin per k-mer of the header, so
//! its length is always `A^k`, even for an empty sequence.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::count::count;
//!
//! let counts = count(&MolType::Dna.alphabet(), b"AACGTTTCG", 2)?;
//! assert_eq!(counts.len(), 16);
//! assert_eq!(counts.get("CG"), Some(2));
//! assert_eq!(counts.get("AT"), Some(0));
//! assert_eq!(counts.total(), 8);
//! # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
//! ```

use std::collections::BTreeMap;

use crate::{
    alphabet::Alphabet,
    error::KmerCountError,
    kmer::{KmerHeader, KmerLength},
    strategy::{CountStrategy, RollingIndex},
};

#[cfg(feature = "tracing")]
use tracing::trace;

/// K-mer counts for one sequence, aligned to the header that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerCounts {
    header: KmerHeader,
    counts: Vec<u64>,
}

impl KmerCounts {
    pub(crate) fn new(header: KmerHeader, counts: Vec<u64>) -> Self {
        debug_assert_eq!(header.len(), counts.len());
        Self { header, counts }
    }

    pub const fn header(&self) -> &KmerHeader {
        &self.header
    }

    /// The counts, by header position.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }

    /// Number of bins, `A^k`.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of counted windows.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Count of `kmer`, or `None` if it is not a k-mer of this header.
    pub fn get(&self, kmer: &str) -> Option<u64> {
        self.header
            .position(kmer.as_bytes())
            .map(|pos| self.counts[pos])
    }

    /// Non-zero bins as `(kmer, count)` pairs, in header order.
    pub fn nonzero(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .filter_map(|(i, &c)| self.header.kmer_at(i).map(|kmer| (kmer, c)))
    }

    /// Re-indexes every bin by k-mer string.
    ///
    /// Counts from strategies with different header orders are equal
    /// exactly when their maps are equal.
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.header.iter().zip(self.counts.iter().copied()).collect()
    }
}

/// Counts the k-mers of `seq` with the default [`RollingIndex`] strategy.
///
/// # Errors
///
/// Returns [`KmerCountError::InvalidKmerLength`] if `k < 1` or `A^k`
/// exceeds [`MAX_BINS`](crate::alphabet::MAX_BINS). Symbols outside the
/// alphabet are never an error: windows containing them are skipped.
pub fn count(alphabet: &Alphabet, seq: &[u8], k: usize) -> Result<KmerCounts, KmerCountError> {
    count_with(&RollingIndex, alphabet, seq, k)
}

/// Counts the k-mers of `seq` with an explicit strategy.
pub fn count_with<S>(
    strategy: &S,
    alphabet: &Alphabet,
    seq: &[u8],
    k: usize,
) -> Result<KmerCounts, KmerCountError>
where
    S: CountStrategy + ?Sized,
{
    let k = KmerLength::new(k)?;
    let header = KmerHeader::new(alphabet.clone(), k, strategy.order())?;
    Ok(count_for_header(strategy, &header, seq))
}

/// Counts `seq` against an already validated header.
pub(crate) fn count_for_header<S>(strategy: &S, header: &KmerHeader, seq: &[u8]) -> KmerCounts
where
    S: CountStrategy + ?Sized,
{
    let mut counts = vec![0; header.len()];
    strategy.count_into(header.alphabet(), seq, header.k(), &mut counts);

    #[cfg(feature = "tracing")]
    trace!(
        strategy = strategy.name(),
        len = seq.len(),
        k = header.k().get(),
        "Counted sequence"
    );

    KmerCounts::new(header.clone(), counts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        alphabet::MolType,
        strategy::{Strategy, WindowTally},
    };

    fn dna() -> Alphabet {
        MolType::Dna.alphabet()
    }

    #[test]
    fn k1_scenario() {
        let counts = count(&dna(), b"AACGTTTCG", 1).unwrap();
        let expected: BTreeMap<String, u64> = [("A", 2), ("C", 2), ("G", 2), ("T", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(counts.to_map(), expected);
    }

    #[test]
    fn k2_scenario() {
        let counts = count(&dna(), b"AACGTTTCG", 2).unwrap();
        let nonzero: Vec<_> = counts.nonzero().collect();
        assert_eq!(
            nonzero,
            [
                ("AA".to_string(), 1),
                ("AC".to_string(), 1),
                ("CG".to_string(), 2),
                ("GT".to_string(), 1),
                ("TC".to_string(), 1),
                ("TT".to_string(), 2),
            ]
        );
        assert_eq!(counts.get("GA"), Some(0));
        assert_eq!(counts.total(), 8);
    }

    #[test]
    fn empty_sequence_gives_all_zero_vector() {
        let counts = count(&dna(), b"", 3).unwrap();
        assert_eq!(counts.len(), 64);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn k_longer_than_sequence_gives_all_zero_vector() {
        let counts = count(&dna(), b"ACG", 4).unwrap();
        assert_eq!(counts.len(), 256);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn k_zero_is_invalid_argument() {
        let err = count(&dna(), b"ACGT", 0).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn gap_and_ambiguity_windows_are_excluded() {
        let counts = count(&dna(), b"AC-GTNNA?T", 2).unwrap();
        // AC, GT
        assert_eq!(counts.total(), 2);
        assert_eq!(counts.get("AC"), Some(1));
        assert_eq!(counts.get("GT"), Some(1));
    }

    #[test]
    fn strategies_agree_by_kmer_not_by_position() {
        let seq = b"TTGACCAGTNNACGTAGGCTTA";
        let rolling = count_with(&RollingIndex, &dna(), seq, 3).unwrap();
        let tally = count_with(&WindowTally, &dna(), seq, 3).unwrap();
        assert_ne!(rolling.counts(), tally.counts());
        assert_eq!(rolling.to_map(), tally.to_map());
    }

    #[test]
    fn selector_matches_concrete_strategy() {
        let seq = b"GATTACA";
        let a = count_with(&Strategy::Tally, &dna(), seq, 2).unwrap();
        let b = count_with(&WindowTally, &dna(), seq, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn get_rejects_foreign_kmers() {
        let counts = count(&dna(), b"ACGT", 2).unwrap();
        assert_eq!(counts.get("NN"), None);
        assert_eq!(counts.get("ACG"), None);
    }

    #[test]
    fn protein_counts() {
        let counts = count(&MolType::Protein.alphabet(), b"MKVLA*MKV", 2).unwrap();
        assert_eq!(counts.len(), 400);
        assert_eq!(counts.get("MK"), Some(2));
        assert_eq!(counts.total(), 6);
    }
}
