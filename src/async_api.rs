//! Async k-mer counting API using Tokio.
//!
//! Counting is CPU-bound, so these functions move the work onto Tokio's
//! blocking thread pool and let other tasks make progress meanwhile.
//!
//! # Feature Flag
//!
//! This module requires the `async` feature to be enabled:
//!
//! ```toml
//! [dependencies]
//! pkt-count-kmers = { version = "0.1", features = ["async"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pkt_count_kmers::alphabet::MolType;
//! use pkt_count_kmers::async_api::count_file_async;
//! use pkt_count_kmers::counter::KmerCounter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let counter = KmerCounter::new(MolType::Dna).k(4)?;
//!     let table = count_file_async(counter, "genome.fa").await?;
//!     println!("Counted {} sequences", table.len());
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use bytes::Bytes;
use tokio::task;

use crate::{
    batch::CountMatrix,
    counter::KmerCounter,
    input::{Input, SequenceFormat},
    output::CountTable,
};

/// Async version of [`KmerCounter::count_many`].
///
/// # Errors
///
/// Returns an error if `k` has not been set on `counter` or the blocking
/// task panicked.
pub async fn count_many_async(
    counter: KmerCounter,
    sequences: Vec<Bytes>,
) -> Result<CountMatrix, Box<dyn std::error::Error + Send + Sync>> {
    let matrix = task::spawn_blocking(move || counter.count_many(&sequences)).await??;
    Ok(matrix)
}

/// Async version of [`KmerCounter::count_file`].
///
/// # Errors
///
/// Returns an error if `k` has not been set, the file cannot be read or
/// parsed, or the blocking task panicked.
pub async fn count_file_async<P: Into<PathBuf>>(
    counter: KmerCounter,
    path: P,
) -> Result<CountTable, Box<dyn std::error::Error + Send + Sync>> {
    let path = path.into();
    let table = task::spawn_blocking(move || counter.count_file(path)).await??;
    Ok(table)
}

/// Async version of [`KmerCounter::count_input`], for stdin or an explicit
/// format.
///
/// # Errors
///
/// Returns an error if `k` has not been set, the input cannot be read or
/// parsed, or the blocking task panicked.
pub async fn count_input_async(
    counter: KmerCounter,
    input: Input,
    format: SequenceFormat,
) -> Result<CountTable, Box<dyn std::error::Error + Send + Sync>> {
    let table = task::spawn_blocking(move || counter.count_input(&input, format)).await??;
    Ok(table)
}
