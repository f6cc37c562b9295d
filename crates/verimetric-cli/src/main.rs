//! Verimetric CLI
//!
//! Offline tools for the verification core, operating on pre-computed
//! embedding files (one JSON array per sample).
//!
//! # Commands
//!
//! - `evaluate`: score a labeled pair list, calibrate the EER threshold,
//!   and report ROC/classification metrics
//! - `compare`: score two embedding files against a fixed threshold

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use verimetric_core::Modality;

mod commands;
mod provider;

pub use provider::StoredEmbeddingProvider;

/// Verimetric - embedding-based verification tooling
#[derive(Parser)]
#[command(name = "verimetric")]
#[command(version = "0.1.0")]
#[command(about = "Evaluation and comparison tools for embedding-based verification")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate a threshold from a labeled verification pair list
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Compare two embedding files against a threshold
    ///
    /// Exits 0 when the pair verifies, 1 otherwise.
    Compare(commands::compare::CompareArgs),
}

/// Clap-facing mirror of [`Modality`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModalityArg {
    Face,
    Voice,
    Keystroke,
    Mouse,
}

impl From<ModalityArg> for Modality {
    fn from(value: ModalityArg) -> Self {
        match value {
            ModalityArg::Face => Modality::Face,
            ModalityArg::Voice => Modality::Voice,
            ModalityArg::Keystroke => Modality::Keystroke,
            ModalityArg::Mouse => Modality::Mouse,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::handle_evaluate(args).await,
        Commands::Compare(args) => commands::compare::handle_compare(args).await,
    };

    std::process::exit(exit_code);
}
