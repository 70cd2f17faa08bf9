//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::{
    alphabet::MolType,
    batch::Execution,
    input::{Input, SequenceFormat},
    kmer::KmerLength,
    output::OutputFormat,
    strategy::Strategy,
};

/// Count k-mers of DNA, RNA or protein sequences into dense vectors.
#[derive(Parser, Debug)]
#[command(name = "pkt-count-kmers")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// K-mer length (1-64, further limited by the alphabet size)
    #[arg(value_parser = parse_k)]
    pub k: usize,

    /// Path to a FASTA or FASTQ file; stdin if omitted or `-`
    pub path: Option<PathBuf>,

    /// Sequence alphabet
    #[arg(short, long, value_enum, default_value_t = MolType::Dna)]
    pub moltype: MolType,

    /// Counting strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Rolling)]
    pub strategy: Strategy,

    /// Count sequences one at a time instead of in parallel
    #[arg(long)]
    pub serial: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tsv)]
    pub format: OutputFormat,

    /// Input format (auto-detected from the file extension by default)
    #[arg(short, long, value_enum, default_value_t = SequenceFormat::Auto)]
    pub input_format: SequenceFormat,

    /// Minimum count for a k-mer to be listed (sparse format only)
    #[arg(long, default_value_t = 1)]
    pub min_count: u64,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Suppress status output on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log progress at info level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn input(&self) -> Input {
        Input::from_optional_path(self.path.as_deref())
    }

    pub const fn execution(&self) -> Execution {
        if self.serial {
            Execution::Serial
        } else {
            Execution::Parallel
        }
    }
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    KmerLength::new(k)
        .map(KmerLength::get)
        .map_err(|e| e.to_string())
}
