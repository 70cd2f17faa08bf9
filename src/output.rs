//! Writers for named count matrices.

use std::{
    fmt,
    io::{self, Write},
};

use clap::ValueEnum;
use serde::{Serialize, Serializer};

use crate::{
    batch::CountMatrix,
    error::KmerCountError,
    kmer::{HeaderOrder, KmerHeader},
};

/// Output format for count tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Dense TSV: a `name` column then one column per k-mer in header order.
    #[default]
    Tsv,
    /// Long TSV (`name\tkmer\tcount`), non-zero bins only.
    Sparse,
    /// A single JSON object holding the header and every row.
    Json,
}

impl OutputFormat {
    /// Whether rows can be written one at a time, without holding the table.
    pub const fn is_streamable(self) -> bool {
        matches!(self, Self::Tsv | Self::Sparse)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tsv => write!(f, "tsv"),
            Self::Sparse => write!(f, "sparse"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A count matrix with a name for each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    names: Vec<String>,
    matrix: CountMatrix,
}

impl CountTable {
    /// Pairs `names` with the rows of `matrix`, in order.
    ///
    /// # Panics
    ///
    /// Debug builds panic if there is not exactly one name per row.
    pub fn new(names: Vec<String>, matrix: CountMatrix) -> Self {
        debug_assert_eq!(names.len(), matrix.n_rows());
        Self { names, matrix }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub const fn matrix(&self) -> &CountMatrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> CountMatrix {
        self.matrix
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(name, counts)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u64])> + '_ {
        self.names.iter().map(String::as_str).zip(self.matrix.rows())
    }
}

#[derive(Serialize)]
struct JsonTable<'a> {
    k: usize,
    alphabet: String,
    order: HeaderOrder,
    #[serde(serialize_with = "serialize_kmers")]
    kmers: &'a KmerHeader,
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    counts: &'a [u64],
}

fn serialize_kmers<S: Serializer>(header: &KmerHeader, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(header.iter())
}

/// Writes the dense TSV header line: `name` then every k-mer.
pub(crate) fn write_tsv_header<W: Write>(header: &KmerHeader, writer: &mut W) -> io::Result<()> {
    write!(writer, "name")?;
    for kmer in header.iter() {
        write!(writer, "\t{kmer}")?;
    }
    writeln!(writer)
}

/// Writes one dense TSV row.
pub(crate) fn write_tsv_row<W: Write>(name: &str, counts: &[u64], writer: &mut W) -> io::Result<()> {
    write!(writer, "{name}")?;
    for count in counts {
        write!(writer, "\t{count}")?;
    }
    writeln!(writer)
}

/// Writes one `name\tkmer\tcount` line per bin of at least `threshold`.
pub(crate) fn write_sparse_row<W: Write>(
    header: &KmerHeader,
    name: &str,
    counts: &[u64],
    threshold: u64,
    writer: &mut W,
) -> io::Result<()> {
    for (i, &count) in counts.iter().enumerate() {
        if count < threshold {
            continue;
        }
        if let Some(kmer) = header.kmer_at(i) {
            writeln!(writer, "{name}\t{kmer}\t{count}")?;
        }
    }
    Ok(())
}

/// Writes `table` to `writer` in `format`.
///
/// `min_count` applies to the sparse format only; zero bins are never
/// written there.
///
/// # Errors
///
/// Returns [`KmerCountError::WriteError`] if writing fails and
/// [`KmerCountError::JsonError`] if serialization fails.
pub fn write_table<W: Write>(
    table: &CountTable,
    format: OutputFormat,
    min_count: u64,
    mut writer: W,
) -> Result<(), KmerCountError> {
    let header = table.matrix().header();

    match format {
        OutputFormat::Tsv => {
            write_tsv_header(header, &mut writer)?;
            for (name, counts) in table.rows() {
                write_tsv_row(name, counts, &mut writer)?;
            }
        }
        OutputFormat::Sparse => {
            let threshold = min_count.max(1);
            for (name, counts) in table.rows() {
                write_sparse_row(header, name, counts, threshold, &mut writer)?;
            }
        }
        OutputFormat::Json => {
            let json = JsonTable {
                k: header.k().get(),
                alphabet: header.alphabet().to_string(),
                order: header.order(),
                kmers: header,
                rows: table
                    .rows()
                    .map(|(name, counts)| JsonRow { name, counts })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut writer, &json)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}
