use std::process;

use clap::Parser;
use colored::Colorize;
use pkt_count_kmers::{
    cli::Args,
    run::{self, RunOptions},
};

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        // --help and --version are not failures
        if !e.use_stderr() {
            e.exit();
        }
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Problem parsing arguments:".blue().bold(),
            e.to_string().trim_end().blue()
        );
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Help menu:".blue().bold(),
            "$ pkt-count-kmers --help".bold()
        );
        process::exit(1);
    });

    #[cfg(feature = "tracing")]
    init_tracing(args.verbose);

    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            eprintln!("{} {e}", "warning:".yellow().bold());
        }
    }

    let input = args.input();
    let options = RunOptions::from(&args);

    if !args.quiet {
        eprintln!("{}: {}", "k-length".bold(), args.k.to_string().blue().bold());
        eprintln!("{}: {}", "data".bold(), input.to_string().underline().bold().blue());
        eprintln!("{}: {}", "moltype".bold(), options.moltype.to_string().blue().bold());
        eprintln!("{}: {}", "strategy".bold(), options.strategy.to_string().blue().bold());
        eprintln!(
            "{}: {}",
            "reader".bold(),
            if cfg!(feature = "needletail") {
                "needletail"
            } else {
                "rust-bio"
            }
            .blue()
            .bold()
        );
        eprintln!();
    }

    match run::run(&input, &options) {
        Ok(summary) => {
            if !args.quiet {
                eprintln!(
                    "{} {} sequences, {} k-mers each, {} windows",
                    "counted".green().bold(),
                    summary.sequences,
                    summary.bins,
                    summary.windows
                );
            }
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".red().bold(),
                e.to_string().red()
            );
            process::exit(1);
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
