//! Input sources and sequence file formats.
//!
//! # Example
//!
//! ```rust
//! use pkt_count_kmers::input::{Input, SequenceFormat};
//! use std::path::Path;
//!
//! let input = Input::from_path(Path::new("reads.fastq.gz"));
//! assert!(input.is_file());
//! assert_eq!(input.format(SequenceFormat::Auto), SequenceFormat::Fastq);
//!
//! assert!(Input::from_path(Path::new("-")).is_stdin());
//! ```

use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use clap::ValueEnum;

/// Where sequences are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// A file on disk, possibly gzip-compressed.
    File(PathBuf),
    /// Standard input.
    #[default]
    Stdin,
}

impl Input {
    /// `-` selects stdin; anything else is a file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// `None` selects stdin.
    #[must_use]
    pub fn from_optional_path(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdin, Self::from_path)
    }

    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path.as_path()),
            Self::Stdin => None,
        }
    }

    /// Whether the file name ends in `.gz`.
    pub fn is_gzip(&self) -> bool {
        self.path()
            .and_then(Path::extension)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    }

    /// Resolves `format` against this input's file name.
    pub fn format(&self, format: SequenceFormat) -> SequenceFormat {
        format.resolve(self.path())
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Sequence record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SequenceFormat {
    /// Decide from the file extension; stdin and unknown extensions are FASTA.
    #[default]
    Auto,
    /// FASTA (`.fa`, `.fasta`, `.fna`, `.faa`).
    Fasta,
    /// FASTQ (`.fq`, `.fastq`).
    Fastq,
}

impl SequenceFormat {
    /// Guesses the format from `path`, looking through a trailing `.gz`.
    #[must_use]
    pub fn from_extension(path: &Path) -> Self {
        let lower = |ext: &OsStr| ext.to_str().map(str::to_ascii_lowercase);
        let mut ext = path.extension().and_then(lower);
        if ext.as_deref() == Some("gz") {
            ext = path
                .file_stem()
                .map(Path::new)
                .and_then(Path::extension)
                .and_then(lower);
        }
        match ext.as_deref() {
            Some("fq" | "fastq") => Self::Fastq,
            _ => Self::Fasta,
        }
    }

    /// Replaces `Auto` with a concrete format.
    #[must_use]
    pub fn resolve(self, path: Option<&Path>) -> Self {
        match self {
            Self::Auto => path.map_or(Self::Fasta, Self::from_extension),
            concrete => concrete,
        }
    }
}

impl fmt::Display for SequenceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fasta => write!(f, "fasta"),
            Self::Fastq => write!(f, "fastq"),
        }
    }
}
