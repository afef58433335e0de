//! phonopatterns - Phonological error-pattern classification
//!
//! Provides CLI utilities and an interactive REPL for classifying
//! target/actual transcription pairs.

use clap::Parser;
use colored::Colorize;
use std::process;

use phonopatterns::cli::{commands, Cli, Commands};
use phonopatterns::repl::{self, ReplConfig};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Repl { debug } => {
            let config = ReplConfig {
                debug,
                ..ReplConfig::default()
            };
            repl::run(&config)
        }
        _ => commands::execute(cli.command),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
