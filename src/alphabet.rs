//! Molecule types and their symbol alphabets.
//!
//! An [`Alphabet`] is an ordered set of ASCII symbols. The order fixes the
//! radix digit of each symbol, and with it the canonical header order of
//! every k-mer built from the alphabet. Lookups are case-insensitive, so
//! soft-masked (lowercase) bases count the same as uppercase ones.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::{error::KmerCountError, kmer::KmerLength};

/// Upper bound on the number of bins in a dense count vector (2^28).
///
/// This caps DNA and RNA at k = 14 and protein at k = 6.
pub const MAX_BINS: usize = 1 << 28;

/// Largest alphabet accepted by [`Alphabet::new`].
pub const MAX_SYMBOLS: usize = 64;

const NOT_IN_ALPHABET: u8 = u8::MAX;

/// The biological sequence type that determines the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MolType {
    /// Unambiguous DNA: `ACGT`.
    #[default]
    Dna,
    /// Unambiguous RNA: `ACGU`.
    Rna,
    /// The twenty standard amino acids.
    Protein,
}

impl MolType {
    /// The symbols of this moltype, in canonical order.
    pub const fn symbols(self) -> &'static [u8] {
        match self {
            Self::Dna => b"ACGT",
            Self::Rna => b"ACGU",
            Self::Protein => b"ACDEFGHIKLMNPQRSTVWY",
        }
    }

    /// Builds the alphabet for this moltype.
    pub fn alphabet(self) -> Alphabet {
        Alphabet::from_valid_symbols(self.symbols())
    }
}

impl fmt::Display for MolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dna => write!(f, "dna"),
            Self::Rna => write!(f, "rna"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

/// A totally ordered set of symbols with a constant-time rank lookup.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    ranks: [u8; 256],
}

impl Alphabet {
    /// Creates an alphabet from `symbols`, in the given order.
    ///
    /// Symbols are stored uppercase. Rejects an empty alphabet, more than
    /// [`MAX_SYMBOLS`] symbols, non-graphic ASCII bytes and symbols that
    /// repeat when case is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkt_count_kmers::alphabet::Alphabet;
    ///
    /// let purines = Alphabet::new(b"AG")?;
    /// assert_eq!(purines.size(), 2);
    /// assert_eq!(purines.rank(b'g'), Some(1));
    /// # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
    /// ```
    pub fn new(symbols: &[u8]) -> Result<Self, KmerCountError> {
        if symbols.is_empty() {
            return Err(KmerCountError::InvalidAlphabet {
                details: "alphabet must contain at least one symbol".to_string(),
            });
        }
        if symbols.len() > MAX_SYMBOLS {
            return Err(KmerCountError::InvalidAlphabet {
                details: format!(
                    "alphabet has {} symbols, at most {MAX_SYMBOLS} are supported",
                    symbols.len()
                ),
            });
        }
        if let Some(&bad) = symbols.iter().find(|b| !b.is_ascii_graphic()) {
            return Err(KmerCountError::InvalidAlphabet {
                details: format!("symbol 0x{bad:02x} is not a printable ASCII character"),
            });
        }
        let upper: Vec<u8> = symbols.iter().map(u8::to_ascii_uppercase).collect();
        for (i, sym) in upper.iter().enumerate() {
            if upper[..i].contains(sym) {
                return Err(KmerCountError::InvalidAlphabet {
                    details: format!("symbol '{}' appears more than once", *sym as char),
                });
            }
        }
        Ok(Self::from_valid_symbols(&upper))
    }

    fn from_valid_symbols(symbols: &[u8]) -> Self {
        let mut ranks = [NOT_IN_ALPHABET; 256];
        for (rank, &sym) in symbols.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let rank = rank as u8;
            ranks[usize::from(sym.to_ascii_uppercase())] = rank;
            ranks[usize::from(sym.to_ascii_lowercase())] = rank;
        }
        Self {
            symbols: symbols.to_vec(),
            ranks,
        }
    }

    /// Number of symbols, `A`.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// The symbols in canonical order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// The symbol with the given rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= self.size()`.
    pub fn symbol(&self, rank: usize) -> u8 {
        self.symbols[rank]
    }

    /// Rank of `byte` in this alphabet, ignoring case.
    #[inline]
    pub fn rank(&self, byte: u8) -> Option<usize> {
        match self.ranks[usize::from(byte)] {
            NOT_IN_ALPHABET => None,
            r => Some(usize::from(r)),
        }
    }

    /// Returns `true` if `byte` belongs to this alphabet, ignoring case.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.ranks[usize::from(byte)] != NOT_IN_ALPHABET
    }

    /// Number of bins (`A^k`) in a dense count vector for `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerCountError::InvalidKmerLength`] if `A^k` exceeds
    /// [`MAX_BINS`].
    pub fn n_bins(&self, k: KmerLength) -> Result<usize, KmerCountError> {
        u32::try_from(k.get())
            .ok()
            .and_then(|exp| self.size().checked_pow(exp))
            .filter(|&bins| bins <= MAX_BINS)
            .ok_or(KmerCountError::InvalidKmerLength {
                k: k.get(),
                max: self.max_k(),
            })
    }

    /// Largest k whose dense vector fits within [`MAX_BINS`].
    pub fn max_k(&self) -> usize {
        let mut k = 1;
        let mut bins = self.size();
        while k < KmerLength::MAX {
            match bins.checked_mul(self.size()) {
                Some(next) if next <= MAX_BINS => {
                    bins = next;
                    k += 1;
                }
                _ => break,
            }
        }
        k
    }
}

impl From<MolType> for Alphabet {
    fn from(moltype: MolType) -> Self {
        moltype.alphabet()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet")
            .field(&String::from_utf8_lossy(&self.symbols))
            .finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.symbols))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dna_ranks_follow_symbol_order() {
        let dna = MolType::Dna.alphabet();
        assert_eq!(dna.rank(b'A'), Some(0));
        assert_eq!(dna.rank(b'C'), Some(1));
        assert_eq!(dna.rank(b'G'), Some(2));
        assert_eq!(dna.rank(b'T'), Some(3));
    }

    #[test]
    fn lookup_ignores_case() {
        let dna = MolType::Dna.alphabet();
        assert_eq!(dna.rank(b'g'), dna.rank(b'G'));
        assert!(dna.contains(b't'));
    }

    #[test]
    fn ambiguity_codes_and_gaps_are_not_symbols() {
        let dna = MolType::Dna.alphabet();
        for b in [b'N', b'-', b'?', b'R', b'Y', b'U', b' '] {
            assert!(!dna.contains(b), "{} should not be DNA", b as char);
        }
        assert!(MolType::Rna.alphabet().contains(b'U'));
        assert!(!MolType::Rna.alphabet().contains(b'T'));
    }

    #[test]
    fn protein_has_twenty_symbols() {
        assert_eq!(MolType::Protein.alphabet().size(), 20);
    }

    #[test]
    fn max_k_per_moltype() {
        assert_eq!(MolType::Dna.alphabet().max_k(), 14);
        assert_eq!(MolType::Rna.alphabet().max_k(), 14);
        assert_eq!(MolType::Protein.alphabet().max_k(), 6);
        assert_eq!(Alphabet::new(b"X").unwrap().max_k(), KmerLength::MAX);
    }

    #[test]
    fn n_bins_rejects_oversized_vectors() {
        let dna = MolType::Dna.alphabet();
        assert_eq!(dna.n_bins(KmerLength::new(3).unwrap()).unwrap(), 64);
        let err = dna.n_bins(KmerLength::new(15).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            KmerCountError::InvalidKmerLength { k: 15, max: 14 }
        ));
    }

    #[test]
    fn custom_alphabet_is_uppercased() {
        let alphabet = Alphabet::new(b"acg").unwrap();
        assert_eq!(alphabet.symbols(), b"ACG");
        assert_eq!(alphabet.to_string(), "ACG");
    }

    #[test]
    fn custom_alphabet_rejects_bad_input() {
        assert!(Alphabet::new(b"").is_err());
        assert!(Alphabet::new(b"ACA").is_err());
        assert!(Alphabet::new(b"Aa").is_err());
        assert!(Alphabet::new(b"A C").is_err());
        assert!(Alphabet::new(&[b'A'; MAX_SYMBOLS + 1]).is_err());
    }

    #[test]
    fn moltype_display() {
        assert_eq!(MolType::Dna.to_string(), "dna");
        assert_eq!(MolType::Protein.to_string(), "protein");
    }
}
