//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phonopatterns")]
#[command(about = "Phonological error-pattern classification for consonant targets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single target/actual pair
    Classify {
        /// Target transcription (1-3 consonants)
        target: String,

        /// Actual transcription as produced
        actual: String,

        /// Emit diagnostic labels for conflicting attributions
        #[arg(short, long)]
        debug: bool,

        /// Re-resolve ambiguous labels by exhaustive alignment
        #[arg(short, long)]
        resolve: bool,

        /// Print a numeric accuracy score for the label
        #[arg(short, long)]
        score: bool,

        /// Score weight configuration (JSON file)
        #[arg(short, long)]
        weights: Option<PathBuf>,
    },

    /// Classify every row of a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file
        output: PathBuf,

        /// Header of the target column
        #[arg(long, default_value = "target")]
        target_column: String,

        /// Header of the actual column
        #[arg(long, default_value = "actual")]
        actual_column: String,

        /// Append a resolved_error column
        #[arg(short, long)]
        resolve: bool,

        /// Append an error_score column
        #[arg(short, long)]
        score: bool,

        /// Record resolver failures instead of aborting
        #[arg(short, long)]
        keep_going: bool,

        /// Score weight configuration (JSON file)
        #[arg(short, long)]
        weights: Option<PathBuf>,
    },

    /// Launch interactive REPL
    Repl {
        /// Emit diagnostic labels for conflicting attributions
        #[arg(short, long)]
        debug: bool,
    },
}
