//! Interchangeable k-mer counting strategies.
//!
//! A strategy fills a dense count vector for one sequence, aligned to a
//! header in the strategy's own [`HeaderOrder`]. Two strategies can disagree
//! on order and still agree on every count once their results are
//! re-indexed by k-mer string (see [`KmerCounts::to_map`](crate::count::KmerCounts::to_map)).
//!
//! The caller picks a strategy where it counts: either a concrete type, or
//! the [`Strategy`] value that the command line parses.

use std::fmt;

use clap::ValueEnum;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    alphabet::Alphabet,
    kmer::{kmer_rank, HeaderOrder, KmerLength},
};

/// A way of counting the k-mers of one sequence.
pub trait CountStrategy: Send + Sync {
    /// Short identifier used in logs and output metadata.
    fn name(&self) -> &'static str;

    /// The header order that [`count_into`](Self::count_into) indexes by.
    fn order(&self) -> HeaderOrder;

    /// Adds the k-mer counts of `seq` into `out`.
    ///
    /// `out` must have exactly `A^k` bins. Windows containing any symbol
    /// outside `alphabet` are skipped.
    fn count_into(&self, alphabet: &Alphabet, seq: &[u8], k: KmerLength, out: &mut [u64]);
}

/// Single pass with a rolling base-`A` rank in lexicographic order.
///
/// The rank drops its leading digit on each step, and both the rank and the
/// run length reset on any non-alphabet symbol. A window is counted once `k`
/// valid symbols are in a row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingIndex;

impl CountStrategy for RollingIndex {
    fn name(&self) -> &'static str {
        "rolling"
    }

    fn order(&self) -> HeaderOrder {
        HeaderOrder::Lexicographic
    }

    fn count_into(&self, alphabet: &Alphabet, seq: &[u8], k: KmerLength, out: &mut [u64]) {
        let k = k.get();
        if seq.len() < k || out.is_empty() {
            return;
        }
        let base = alphabet.size();
        // A^(k-1): the rank modulo this drops the leading digit
        let lower = out.len() / base;
        let mut index = 0usize;
        let mut run = 0usize;

        for &byte in seq {
            if let Some(rank) = alphabet.rank(byte) {
                index = (index % lower) * base + rank;
                run += 1;
                if run >= k {
                    out[index] += 1;
                }
            } else {
                index = 0;
                run = 0;
            }
        }
    }
}

/// Window-by-window tally keyed by the window bytes, re-indexed into
/// colexicographic order at the end.
///
/// Slower than [`RollingIndex`], and it shares none of its indexing logic,
/// so it serves as an independent reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowTally;

impl CountStrategy for WindowTally {
    fn name(&self) -> &'static str {
        "tally"
    }

    fn order(&self) -> HeaderOrder {
        HeaderOrder::Colexicographic
    }

    fn count_into(&self, alphabet: &Alphabet, seq: &[u8], k: KmerLength, out: &mut [u64]) {
        let k = k.get();
        if seq.len() < k {
            return;
        }
        let mut tally: FxHashMap<&[u8], u64> = FxHashMap::default();

        let mut i = 0;
        while i <= seq.len() - k {
            let window = &seq[i..i + k];
            match window.iter().rposition(|&b| !alphabet.contains(b)) {
                None => {
                    *tally.entry(window).or_insert(0) += 1;
                    i += 1;
                }
                // No window overlapping the invalid symbol can be counted
                Some(invalid) => i += invalid + 1,
            }
        }

        for (window, n) in tally {
            if let Some(pos) = kmer_rank(alphabet, window, HeaderOrder::Colexicographic) {
                out[pos] += n;
            }
        }
    }
}

/// Strategy selector for the command line and the builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// [`RollingIndex`]: one pass, lexicographic header.
    #[default]
    Rolling,
    /// [`WindowTally`]: hash-map tally, colexicographic header.
    Tally,
}

impl Strategy {
    /// The concrete strategy this value selects.
    pub fn resolve(self) -> &'static dyn CountStrategy {
        match self {
            Self::Rolling => &RollingIndex,
            Self::Tally => &WindowTally,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rolling => write!(f, "rolling"),
            Self::Tally => write!(f, "tally"),
        }
    }
}

impl CountStrategy for Strategy {
    fn name(&self) -> &'static str {
        self.resolve().name()
    }

    fn order(&self) -> HeaderOrder {
        self.resolve().order()
    }

    fn count_into(&self, alphabet: &Alphabet, seq: &[u8], k: KmerLength, out: &mut [u64]) {
        self.resolve().count_into(alphabet, seq, k, out);
    }
}
