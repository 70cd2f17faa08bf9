//! Dense k-mer count vectors for DNA, RNA and protein sequences.
//!
//! For an alphabet of size `A` and a k-mer length `k`, every sequence is
//! counted into a vector of length `A^k`. Position `i` of the vector holds
//! the count of the `i`-th k-mer of a [`KmerHeader`](kmer::KmerHeader), the
//! ordered enumeration of all k-mers. Windows containing a symbol outside
//! the alphabet are skipped.
//!
//! # Quick start
//!
//! ```rust
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::count::count;
//! use pkt_count_kmers::kmer::kmer_header;
//!
//! let dna = MolType::Dna.alphabet();
//! assert_eq!(kmer_header(&dna, 1)?, ["A", "C", "G", "T"]);
//!
//! let counts = count(&dna, b"AACGTTTCG", 1)?;
//! assert_eq!(counts.counts(), &[2, 2, 2, 3]);
//! # Ok::<(), pkt_count_kmers::error::KmerCountError>(())
//! ```
//!
//! Batches go through [`KmerCounter`](counter::KmerCounter) or the free
//! functions in [`batch`], serially or on the rayon pool; both produce the
//! same [`CountMatrix`](batch::CountMatrix).
//!
//! # Features
//!
//! - `tracing` (default): spans and events for reading and counting.
//! - `gzip`: transparent decompression of `.gz` input.
//! - `mmap`: [`reader::read_sequences_mmap`].
//! - `needletail`: needletail instead of rust-bio for parsing.
//! - `async`: Tokio wrappers in `async_api`.

pub mod alphabet;
#[cfg(feature = "async")]
pub mod async_api;
pub mod batch;
pub mod cli;
pub mod count;
pub mod counter;
pub mod error;
pub mod input;
pub mod kmer;
pub mod output;
pub mod progress;
pub mod reader;
pub mod run;
pub mod strategy;

pub use alphabet::{Alphabet, MolType};
pub use batch::{CountMatrix, Execution};
pub use count::{count, KmerCounts};
pub use counter::KmerCounter;
pub use error::KmerCountError;
pub use kmer::{kmer_header, KmerHeader};
pub use strategy::{CountStrategy, Strategy};
