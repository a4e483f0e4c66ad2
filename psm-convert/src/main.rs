//! Annotate tab separated PSM tables and write the synopsis, modification summary, and sequence info files

use std::{
    fs::File,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use psmcore::PsmError;
use psmident::{SearchEngine, SearchEngineParameters};

mod convert;
mod table;

use convert::{Converted, convert_file, io_error, write_summary_file};

/// The command line interface arguments
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The input PSM tables (tab separated, with at least the columns `Scan`, `Charge`, and `Peptide`)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,
    /// The search parameters as JSON
    #[arg(short, long)]
    parameters: Option<PathBuf>,
    /// The directory to write the output files to
    #[arg(short, long, default_value = ".")]
    output_directory: PathBuf,
    /// Overrule the search engine given in the parameters (eg `MSGF+`, `MaxQuant`, `DIA-NN`)
    #[arg(short, long, value_parser = engine_parser)]
    engine: Option<SearchEngine>,
    /// Show debug logging, `RUST_LOG` takes precedence
    #[arg(short, long)]
    verbose: bool,
}

/// # Errors
/// If the text is not a known search engine.
fn engine_parser(value: &str) -> Result<SearchEngine, String> {
    value.parse().map_err(|e: PsmError| e.to_string())
}

fn main() {
    let args = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if args.verbose { "debug" } else { "info" })
        }))
        .init();

    if let Err(error) = run(&args) {
        error!("Conversion failed");
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), PsmError> {
    let mut parameters = match &args.parameters {
        Some(path) => SearchEngineParameters::from_reader(
            File::open(path).map_err(|e| io_error("Could not open parameter file", path, &e))?,
        )?,
        None => SearchEngineParameters::default(),
    };
    if let Some(engine) = args.engine {
        parameters.engine = engine;
    }
    info!("Annotating {} file(s) as {}", args.input.len(), parameters.engine);
    std::fs::create_dir_all(&args.output_directory)
        .map_err(|e| io_error("Could not create output directory", &args.output_directory, &e))?;

    let (annotator, registry) = parameters.build()?;
    let cancel = AtomicBool::new(false);
    let converted: Vec<Result<Converted, PsmError>> = args
        .input
        .par_iter()
        .map(|input| {
            let outcome = convert_file(
                input,
                &args.output_directory,
                &annotator,
                registry.detached(),
                &cancel,
            );
            // A file that cannot be read or written aborts the other files at their next row
            if outcome.is_err() {
                cancel.store(true, Ordering::Relaxed);
            }
            outcome
        })
        .collect();

    let mut combined = registry.detached();
    let mut failed = None;
    for outcome in converted {
        match outcome {
            Ok(converted) => {
                if converted.summary.with_errors > 0 || converted.summary.invalid_rows > 0 {
                    warn!(
                        "{}: {} PSMs with errors, {} unreadable rows",
                        converted.input.display(),
                        converted.summary.with_errors,
                        converted.summary.invalid_rows
                    );
                }
                if converted.summary.cancelled {
                    warn!("{}: stopped early, the output is incomplete", converted.input.display());
                }
                combined.merge(&converted.registry);
            }
            Err(error) => {
                error!("{error}");
                failed = Some(error);
            }
        }
    }
    if args.input.len() > 1 {
        write_summary_file(&args.output_directory, "Combined", &combined)?;
    }
    failed.map_or(Ok(()), Err)
}
