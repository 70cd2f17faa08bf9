//! Reading named sequences from FASTA and FASTQ input.
//!
//! The default backend is rust-bio. The `needletail` feature swaps in
//! needletail's parser, which detects FASTA/FASTQ and compression by
//! itself. With the `gzip` feature, rust-bio input whose name ends in `.gz`
//! is decompressed on the fly. The `mmap` feature adds
//! [`read_sequences_mmap`].

use bytes::Bytes;

use crate::{
    error::KmerCountError,
    input::{Input, SequenceFormat},
};

#[cfg(any(not(feature = "needletail"), feature = "mmap"))]
use std::io::Read;

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

/// One input record: its identifier and its raw sequence bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: String,
    pub seq: Bytes,
}

impl NamedSequence {
    pub fn new(name: impl Into<String>, seq: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
        }
    }
}

impl AsRef<[u8]> for NamedSequence {
    fn as_ref(&self) -> &[u8] {
        &self.seq
    }
}

/// Reads every record of `input`, in file order.
///
/// # Errors
///
/// Returns [`KmerCountError::SequenceRead`] if the file cannot be opened and
/// [`KmerCountError::SequenceParse`] if a record is malformed.
#[cfg(not(feature = "needletail"))]
pub fn read_sequences(
    input: &Input,
    format: SequenceFormat,
) -> Result<Vec<NamedSequence>, KmerCountError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("read_sequences", input = %input).entered();

    let format = input.format(format);
    let records = parse_records(open(input)?, format)?;

    #[cfg(feature = "tracing")]
    debug!(records = records.len(), format = %format, "Read sequence records");

    Ok(records)
}

#[cfg(not(feature = "needletail"))]
fn open(input: &Input) -> Result<Box<dyn Read>, KmerCountError> {
    use std::{fs::File, io};

    match input {
        Input::Stdin => Ok(Box::new(io::stdin().lock())),
        Input::File(path) => {
            let file = File::open(path).map_err(|source| KmerCountError::SequenceRead {
                source,
                path: path.clone(),
            })?;

            #[cfg(feature = "gzip")]
            {
                if input.is_gzip() {
                    return open_gzip(file, path);
                }
            }

            Ok(Box::new(file))
        }
    }
}

/// Wraps `file` in a gzip decoder, failing early if it is not gzip data.
#[cfg(all(feature = "gzip", not(feature = "needletail")))]
fn open_gzip(
    file: std::fs::File,
    path: &std::path::Path,
) -> Result<Box<dyn Read>, KmerCountError> {
    use flate2::read::MultiGzDecoder;
    use std::io::{BufRead, BufReader};

    let mut decoder = BufReader::new(MultiGzDecoder::new(file));
    decoder
        .fill_buf()
        .map_err(|source| KmerCountError::GzipError {
            source,
            path: path.to_path_buf(),
        })?;
    Ok(Box::new(decoder))
}

#[cfg(feature = "needletail")]
pub fn read_sequences(
    input: &Input,
    _format: SequenceFormat,
) -> Result<Vec<NamedSequence>, KmerCountError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("read_sequences", input = %input).entered();

    let mut reader = match input {
        Input::File(path) => {
            needletail::parse_fastx_file(path).map_err(|e| KmerCountError::SequenceRead {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
                path: path.clone(),
            })?
        }
        Input::Stdin => {
            needletail::parse_fastx_stdin().map_err(|e| KmerCountError::SequenceParse {
                details: e.to_string(),
            })?
        }
    };

    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| KmerCountError::SequenceParse {
            details: e.to_string(),
        })?;
        // needletail returns the whole header line; keep the identifier only
        let id = record
            .id()
            .split(u8::is_ascii_whitespace)
            .next()
            .unwrap_or_default();
        records.push(NamedSequence::new(
            String::from_utf8_lossy(id),
            Bytes::copy_from_slice(&record.seq()),
        ));
    }

    #[cfg(feature = "tracing")]
    debug!(records = records.len(), "Read sequence records");

    Ok(records)
}

/// Memory-maps the file at `path` and parses its records.
///
/// # Safety
///
/// The file must not be modified while it is being read.
#[cfg(feature = "mmap")]
pub fn read_sequences_mmap<P: AsRef<std::path::Path>>(
    path: P,
    format: SequenceFormat,
) -> Result<Vec<NamedSequence>, KmerCountError> {
    use memmap2::Mmap;
    use std::fs::File;

    let path = path.as_ref();

    #[cfg(feature = "tracing")]
    let _span = info_span!("read_sequences_mmap", path = ?path).entered();

    let file = File::open(path).map_err(|source| KmerCountError::SequenceRead {
        source,
        path: path.to_path_buf(),
    })?;
    // SAFETY: We rely on the file not being modified while mapped.
    // The mapping is dropped before this function returns.
    #[allow(unsafe_code)]
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| KmerCountError::MmapError {
        source,
        path: path.to_path_buf(),
    })?;

    let records = parse_records(&mmap[..], format.resolve(Some(path)))?;

    #[cfg(feature = "tracing")]
    debug!(records = records.len(), bytes = mmap.len(), "Read memory-mapped records");

    Ok(records)
}

/// Parses FASTA or FASTQ records with rust-bio.
#[cfg(any(not(feature = "needletail"), feature = "mmap"))]
fn parse_records<R: Read>(
    reader: R,
    format: SequenceFormat,
) -> Result<Vec<NamedSequence>, KmerCountError> {
    use bio::io::{fasta, fastq};

    let parse_error = |e: &dyn std::fmt::Display| KmerCountError::SequenceParse {
        details: e.to_string(),
    };

    match format {
        SequenceFormat::Fastq => fastq::Reader::new(reader)
            .records()
            .map(|r| {
                r.map(|rec| NamedSequence::new(rec.id(), Bytes::copy_from_slice(rec.seq())))
                    .map_err(|e| parse_error(&e))
            })
            .collect(),
        SequenceFormat::Fasta | SequenceFormat::Auto => fasta::Reader::new(reader)
            .records()
            .map(|r| {
                r.map(|rec| NamedSequence::new(rec.id(), Bytes::copy_from_slice(rec.seq())))
                    .map_err(|e| parse_error(&e))
            })
            .collect(),
    }
}
