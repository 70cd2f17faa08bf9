//! K-mer lengths and the canonical k-mer header.
//!
//! A [`KmerHeader`] enumerates every k-mer over an alphabet exactly once.
//! Each k-mer is a k-digit number in base `A` (the alphabet size), with
//! digits given by symbol rank. [`HeaderOrder`] picks which end of the
//! k-mer is the most significant digit. The header is never stored as a
//! string table. Positions and k-mers are converted arithmetically, and
//! strings are only built when asked for.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::kmer::{kmer_header, HeaderOrder, KmerHeader, KmerLength};
//!
//! let header = kmer_header(&MolType::Dna.alphabet(), 2)?;
//! assert_eq!(header.len(), 16);
//! assert_eq!(&header[..5], ["AA", "AC", "AG", "AT", "CA"]);
//!
//! let colex = KmerHeader::new(
//!     MolType::Dna.alphabet(),
//!     KmerLength::new(2)?,
//!     HeaderOrder::Colexicographic,
//! )?;
//! assert_eq!(colex.kmer_at(1).as_deref(), Some("CA"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::Serialize;

use crate::{
    alphabet::Alphabet,
    error::{KmerCountError, KmerLengthError},
};

/// A validated k-mer length (`1..=64`).
///
/// The 64 cap holds for every alphabet, even a single-symbol one whose
/// vector always has one bin. Larger alphabets impose a tighter bound; see
/// [`Alphabet::max_k`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Shortest window length.
    pub const MIN: usize = 1;
    /// Longest window length, whatever the alphabet.
    pub const MAX: usize = 64;

    /// Validates `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is outside `1..=64`.
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < Self::MIN || k > Self::MAX {
            return Err(KmerLengthError {
                k,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(k))
    }

    /// Returns the length as a `usize`.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl fmt::Display for KmerLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digit significance used to enumerate a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderOrder {
    /// First symbol is the most significant digit: `AA, AC, AG, AT, CA, ...`.
    ///
    /// This is lexicographic order under the alphabet's symbol order.
    #[default]
    Lexicographic,
    /// Last symbol is the most significant digit: `AA, CA, GA, TA, AC, ...`.
    Colexicographic,
}

impl fmt::Display for HeaderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => write!(f, "lexicographic"),
            Self::Colexicographic => write!(f, "colexicographic"),
        }
    }
}

/// The ordered enumeration of all `A^k` k-mers over an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerHeader {
    alphabet: Alphabet,
    k: KmerLength,
    order: HeaderOrder,
    len: usize,
}

impl KmerHeader {
    /// Creates the header for `k` over `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCountError::InvalidKmerLength`] if the header would
    /// exceed [`MAX_BINS`](crate::alphabet::MAX_BINS) entries.
    pub fn new(
        alphabet: Alphabet,
        k: KmerLength,
        order: HeaderOrder,
    ) -> Result<Self, KmerCountError> {
        let len = alphabet.n_bins(k)?;
        Ok(Self {
            alphabet,
            k,
            order,
            len,
        })
    }

    /// Number of k-mers in the header, `A^k`.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: every alphabet has at least one symbol.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn k(&self) -> KmerLength {
        self.k
    }

    pub const fn order(&self) -> HeaderOrder {
        self.order
    }

    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Position of `kmer` in this header, ignoring case.
    ///
    /// Returns `None` if `kmer` has the wrong length or contains a symbol
    /// outside the alphabet.
    pub fn position(&self, kmer: &[u8]) -> Option<usize> {
        if kmer.len() != self.k.get() {
            return None;
        }
        kmer_rank(&self.alphabet, kmer, self.order)
    }

    /// The k-mer at `index`, or `None` past the end of the header.
    pub fn kmer_at(&self, index: usize) -> Option<String> {
        (index < self.len).then(|| self.decode(index))
    }

    fn decode(&self, mut index: usize) -> String {
        let base = self.alphabet.size();
        let k = self.k.get();
        let mut bytes = vec![0u8; k];
        for i in 0..k {
            let slot = match self.order {
                HeaderOrder::Lexicographic => k - 1 - i,
                HeaderOrder::Colexicographic => i,
            };
            bytes[slot] = self.alphabet.symbol(index % base);
            index /= base;
        }
        // Alphabet symbols are printable ASCII.
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Iterates the k-mers in header order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.len).map(|i| self.decode(i))
    }

    /// Materializes the header as strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().collect()
    }
}

/// Rank of `kmer` read as a base-`A` number under `order`.
///
/// The caller checks that `kmer` has the header's length.
pub(crate) fn kmer_rank(alphabet: &Alphabet, kmer: &[u8], order: HeaderOrder) -> Option<usize> {
    let base = alphabet.size();
    let digit = |acc: usize, &b: &u8| Some(acc * base + alphabet.rank(b)?);
    match order {
        HeaderOrder::Lexicographic => kmer.iter().try_fold(0, digit),
        HeaderOrder::Colexicographic => kmer.iter().rev().try_fold(0, digit),
    }
}

/// Lists every k-mer over `alphabet` in lexicographic order.
///
/// # Errors
///
/// Returns [`KmerCountError::InvalidKmerLength`] if `k` is outside
/// `1..=64` or `A^k` exceeds [`MAX_BINS`](crate::alphabet::MAX_BINS).
pub fn kmer_header(alphabet: &Alphabet, k: usize) -> Result<Vec<String>, KmerCountError> {
    kmer_header_with_order(alphabet, k, HeaderOrder::Lexicographic)
}

/// Lists every k-mer over `alphabet` in the given order.
pub fn kmer_header_with_order(
    alphabet: &Alphabet,
    k: usize,
    order: HeaderOrder,
) -> Result<Vec<String>, KmerCountError> {
    let k = KmerLength::new(k)?;
    Ok(KmerHeader::new(alphabet.clone(), k, order)?.to_vec())
}
