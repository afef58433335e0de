//! CLI command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::batch::{self, BatchOptions};
use crate::classify::Classifier;
use crate::quantify::WeightConfig;

use super::args::Commands;

/// Execute a CLI command
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Repl { .. } => {
            // Handled in main.rs
            unreachable!("REPL command should be handled in main");
        }
        Commands::Classify {
            target,
            actual,
            debug,
            resolve,
            score,
            weights,
        } => cmd_classify(&target, &actual, debug, resolve, score, weights),
        Commands::Batch {
            input,
            output,
            target_column,
            actual_column,
            resolve,
            score,
            keep_going,
            weights,
        } => cmd_batch(
            &input,
            &output,
            target_column,
            actual_column,
            resolve,
            score,
            keep_going,
            weights,
        ),
    }
}

fn load_weights(path: Option<PathBuf>) -> Result<WeightConfig> {
    match path {
        Some(path) => WeightConfig::load(&path)
            .with_context(|| format!("failed to load weights from {}", path.display())),
        None => Ok(WeightConfig::default()),
    }
}

/// Classify command
fn cmd_classify(
    target: &str,
    actual: &str,
    debug: bool,
    resolve: bool,
    score: bool,
    weights: Option<PathBuf>,
) -> Result<()> {
    let weights = load_weights(weights)?;
    let classifier = Classifier::new();

    let label = if debug {
        classifier.classify_debug(target, actual)?
    } else {
        classifier.classify(target, actual)?
    };
    println!("{label}");

    let mut scorable = label.to_string();
    if resolve && label.needs_resolution() {
        let resolution = classifier.resolve(target, actual, &label)?;
        println!("{} {}", "resolved:".green().bold(), resolution.label);
        if let Some(alignment) = &resolution.alignment {
            println!("{} {}", "alignment:".green(), alignment);
        }
        scorable = resolution.label.to_string();
    }

    if score {
        let value = crate::quantify::score(&scorable, &weights);
        println!("{} {value:.4}", "score:".cyan().bold());
    }

    Ok(())
}

/// Batch command
#[allow(clippy::too_many_arguments)]
fn cmd_batch(
    input: &Path,
    output: &Path,
    target_column: String,
    actual_column: String,
    resolve: bool,
    score: bool,
    keep_going: bool,
    weights: Option<PathBuf>,
) -> Result<()> {
    let options = BatchOptions {
        target_column,
        actual_column,
        resolve,
        score,
        keep_going,
        weights: load_weights(weights)?,
    };

    let classifier = Classifier::new();
    let summary = batch::process_file(&classifier, input, output, &options)?;

    println!(
        "{} {} row(s): {} labeled, {} skipped, {} unresolved",
        "Done".green().bold(),
        summary.rows,
        summary.labeled,
        summary.skipped,
        summary.resolver_errors
    );

    Ok(())
}
