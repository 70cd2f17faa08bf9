//! Read, count and write: the pipeline behind the binary.

use std::io::{stdout, BufWriter, Write};

use crate::{
    alphabet::MolType,
    batch::Execution,
    cli::Args,
    counter::KmerCounter,
    error::KmerCountError,
    input::{Input, SequenceFormat},
    output::{write_sparse_row, write_table, write_tsv_header, write_tsv_row, OutputFormat},
    reader::read_sequences,
    strategy::Strategy,
};

/// Cells counted per chunk when streaming rows (2^22, or 32 MiB of counts).
const STREAM_CHUNK_CELLS: usize = 1 << 22;

#[cfg(feature = "tracing")]
use tracing::{info, info_span};

/// Everything a run needs besides the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub k: usize,
    pub moltype: MolType,
    pub strategy: Strategy,
    pub execution: Execution,
    pub input_format: SequenceFormat,
    pub output_format: OutputFormat,
    pub min_count: u64,
}

impl RunOptions {
    /// Options with the command-line defaults for `k`.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            moltype: MolType::default(),
            strategy: Strategy::default(),
            execution: Execution::default(),
            input_format: SequenceFormat::default(),
            output_format: OutputFormat::default(),
            min_count: 1,
        }
    }
}

impl From<&Args> for RunOptions {
    fn from(args: &Args) -> Self {
        Self {
            k: args.k,
            moltype: args.moltype,
            strategy: args.strategy,
            execution: args.execution(),
            input_format: args.input_format,
            output_format: args.format,
            min_count: args.min_count,
        }
    }
}

/// What a run counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Records read.
    pub sequences: usize,
    /// Bins per row.
    pub bins: usize,
    /// Valid windows counted across all records.
    pub windows: u64,
}

/// Counts `input` and writes the table to stdout.
///
/// # Errors
///
/// Returns [`KmerCountError`] if `k` is invalid for the alphabet, the input
/// cannot be read, or the output cannot be written.
pub fn run(input: &Input, options: &RunOptions) -> Result<RunSummary, KmerCountError> {
    let out = BufWriter::new(stdout().lock());
    run_to_writer(input, options, out)
}

/// Counts `input` and writes the table to `writer`.
///
/// TSV and sparse output are counted and written a chunk of records at a
/// time, so memory stays bounded whatever the number of records. JSON needs
/// the whole table and is limited by
/// [`MAX_MATRIX_CELLS`](crate::batch::MAX_MATRIX_CELLS).
pub fn run_to_writer<W: Write>(
    input: &Input,
    options: &RunOptions,
    mut writer: W,
) -> Result<RunSummary, KmerCountError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("run", k = options.k, moltype = %options.moltype).entered();

    let counter = KmerCounter::new(options.moltype)
        .k(options.k)?
        .strategy(options.strategy)
        .execution(options.execution);

    let summary = if options.output_format.is_streamable() {
        stream_rows(&counter, input, options, &mut writer)?
    } else {
        let table = counter.count_input(input, options.input_format)?;
        write_table(&table, options.output_format, options.min_count, &mut writer)?;
        RunSummary {
            sequences: table.len(),
            bins: table.matrix().n_cols(),
            windows: table.matrix().totals().iter().sum(),
        }
    };

    #[cfg(feature = "tracing")]
    info!(
        sequences = summary.sequences,
        bins = summary.bins,
        windows = summary.windows,
        format = %options.output_format,
        "Wrote count table"
    );

    Ok(summary)
}

fn stream_rows<W: Write>(
    counter: &KmerCounter,
    input: &Input,
    options: &RunOptions,
    writer: &mut W,
) -> Result<RunSummary, KmerCountError> {
    let header = counter.header()?;
    let records = read_sequences(input, options.input_format)?;
    let rows_per_chunk = (STREAM_CHUNK_CELLS / header.len()).max(1);

    #[cfg(feature = "tracing")]
    info!(
        input = %input,
        sequences = records.len(),
        rows_per_chunk,
        "Streaming k-mer counts"
    );

    if options.output_format == OutputFormat::Tsv {
        write_tsv_header(&header, writer)?;
    }
    let threshold = options.min_count.max(1);
    let mut windows = 0;

    for chunk in records.chunks(rows_per_chunk) {
        let matrix = counter.count_many(chunk)?;
        for (record, counts) in chunk.iter().zip(matrix.rows()) {
            windows += counts.iter().sum::<u64>();
            if options.output_format == OutputFormat::Tsv {
                write_tsv_row(&record.name, counts, writer)?;
            } else {
                write_sparse_row(&header, &record.name, counts, threshold, writer)?;
            }
        }
    }
    writer.flush()?;

    Ok(RunSummary {
        sequences: records.len(),
        bins: header.len(),
        windows,
    })
}
