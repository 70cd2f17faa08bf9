//! Error types for pkt-count-kmers.
//!
//! Every fallible library operation returns [`KmerCountError`]. Callers that
//! only care about the broad category of a failure can match on
//! [`KmerCountError::kind`].

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`KmerCountError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied argument was unusable (bad k, bad alphabet, missing k,
    /// or a batch too large to hold as one matrix).
    InvalidArgument,
    /// Reading input or writing output failed.
    Io,
    /// Input could not be parsed, or output could not be serialized.
    Parse,
    /// A batch was cancelled before every row was counted.
    Cancelled,
}

/// Errors that can occur in pkt-count-kmers operations.
#[derive(Debug, Error)]
pub enum KmerCountError {
    /// K-mer length is below 1 or would need more bins than a dense vector allows.
    #[error("invalid k-mer length {k}: must be between 1 and {max} for this alphabet")]
    InvalidKmerLength { k: usize, max: usize },

    /// The symbols given for a custom alphabet are unusable.
    #[error("invalid alphabet: {details}")]
    InvalidAlphabet { details: String },

    /// A batch would need more matrix cells than can be allocated.
    #[error("count matrix of {rows} x {cols} bins is too large to allocate")]
    MatrixTooLarge { rows: usize, cols: usize },

    /// A counter was asked to count before its k-mer length was set.
    #[error("k-mer length not set; call .k() first")]
    KmerLengthNotSet,

    /// Failed to read sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SequenceRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to parse sequence record.
    #[error("failed to parse sequence record: {details}")]
    SequenceParse { details: String },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },

    /// Failed to decompress gzip file.
    #[cfg(feature = "gzip")]
    #[error("failed to decompress gzip file '{path}': {source}")]
    GzipError {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to memory-map file.
    #[cfg(feature = "mmap")]
    #[error("failed to memory-map file '{path}': {source}")]
    MmapError {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Batch counting was cancelled through a [`CancelToken`](crate::batch::CancelToken).
    #[error("counting cancelled after {completed} of {total} sequences")]
    Cancelled { completed: usize, total: usize },
}

impl KmerCountError {
    /// Returns the broad category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKmerLength { .. }
            | Self::InvalidAlphabet { .. }
            | Self::MatrixTooLarge { .. }
            | Self::KmerLengthNotSet => ErrorKind::InvalidArgument,
            Self::SequenceRead { .. } | Self::WriteError { .. } => ErrorKind::Io,
            #[cfg(feature = "gzip")]
            Self::GzipError { .. } => ErrorKind::Io,
            #[cfg(feature = "mmap")]
            Self::MmapError { .. } => ErrorKind::Io,
            Self::SequenceParse { .. } | Self::JsonError { .. } => ErrorKind::Parse,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Returns `true` if this error was caused by an unusable argument.
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument)
    }
}

/// Error for a k-mer length that is out of range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: usize,
    /// Maximum valid k-mer length.
    pub max: usize,
}

impl From<std::io::Error> for KmerCountError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteError { source }
    }
}

impl From<serde_json::Error> for KmerCountError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KmerCountError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            max: err.max,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kmer_length_error_display() {
        let err = KmerLengthError {
            k: 0,
            min: 1,
            max: 14,
        };
        assert_eq!(
            err.to_string(),
            "k-mer length 0 is out of range: must be between 1 and 14"
        );
    }

    #[test]
    fn count_error_from_kmer_length_error() {
        let err: KmerCountError = KmerLengthError {
            k: 0,
            min: 1,
            max: 14,
        }
        .into();
        assert!(matches!(
            err,
            KmerCountError::InvalidKmerLength { k: 0, max: 14 }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn kinds_are_classified() {
        assert!(KmerCountError::KmerLengthNotSet.is_invalid_argument());
        assert!(KmerCountError::InvalidAlphabet {
            details: "empty".to_string()
        }
        .is_invalid_argument());
        assert_eq!(
            KmerCountError::SequenceParse {
                details: "bad".to_string()
            }
            .kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            KmerCountError::Cancelled {
                completed: 1,
                total: 3
            }
            .kind(),
            ErrorKind::Cancelled
        );
        let io: KmerCountError = std::io::Error::other("closed pipe").into();
        assert_eq!(io.kind(), ErrorKind::Io);
    }

    #[test]
    fn cancelled_display() {
        let err = KmerCountError::Cancelled {
            completed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "counting cancelled after 2 of 5 sequences");
    }
}
