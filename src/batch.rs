//! Tabular processing.
//!
//! Reads a CSV with target/actual columns, appends label columns, and
//! writes the result. Rows with invalid targets are recorded empty and
//! skipped rather than aborting the run; resolver failures abort unless
//! `keep_going` is set, in which case the error text lands in the cell.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::classify::Classifier;
use crate::features::FeatureService;
use crate::quantify::{score, WeightConfig};

/// Progress note cadence, in rows.
const PROGRESS_EVERY: usize = 1000;

/// Batch run configuration.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Header of the target column.
    pub target_column: String,
    /// Header of the actual column.
    pub actual_column: String,
    /// Resolve ambiguous labels: the outcome replaces `error_pattern`
    /// and is repeated in an appended `resolved_error` column.
    pub resolve: bool,
    /// Append an `error_score` column.
    pub score: bool,
    /// Record resolver failures in the cell instead of aborting.
    pub keep_going: bool,
    /// Weights for the `error_score` column.
    pub weights: WeightConfig,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            target_column: "target".to_string(),
            actual_column: "actual".to_string(),
            resolve: false,
            score: false,
            keep_going: false,
            weights: WeightConfig::default(),
        }
    }
}

/// Counts reported after a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Data rows read.
    pub rows: usize,
    /// Rows that received a label.
    pub labeled: usize,
    /// Rows skipped for invalid targets.
    pub skipped: usize,
    /// Rows whose resolution failed (only counted with `keep_going`).
    pub resolver_errors: usize,
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("input has no '{name}' column"))
}

/// Runs the classifier over every row of `input`, writing the augmented
/// table to `output`.
///
/// Output columns are the input columns plus `error_pattern` and
/// `error_basic`, then `resolved_error` and `error_score` when enabled.
/// Where resolution produced an outcome, `error_pattern` carries it and
/// `resolved_error` records it; rows that needed no resolution leave
/// `resolved_error` empty. `error_basic` always collapses the
/// pre-resolution label, and `error_score` rates whatever ended up in
/// `error_pattern`.
pub fn process<F, R, W>(
    classifier: &Classifier<F>,
    input: R,
    output: W,
    options: &BatchOptions,
) -> Result<BatchSummary>
where
    F: FeatureService,
    R: Read,
    W: Write,
{
    let mut reader = ReaderBuilder::new().from_reader(input);
    let headers = reader
        .headers()
        .context("failed to read CSV header")?
        .clone();
    let target_index = column_index(&headers, &options.target_column)?;
    let actual_index = column_index(&headers, &options.actual_column)?;

    let mut out_headers = headers.clone();
    out_headers.push_field("error_pattern");
    out_headers.push_field("error_basic");
    if options.resolve {
        out_headers.push_field("resolved_error");
    }
    if options.score {
        out_headers.push_field("error_score");
    }

    let mut writer = WriterBuilder::new().from_writer(output);
    writer
        .write_record(&out_headers)
        .context("failed to write CSV header")?;

    let mut summary = BatchSummary::default();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record.with_context(|| format!("failed to read row {row}"))?;
        summary.rows += 1;

        let target = record.get(target_index).unwrap_or("").trim();
        let actual = record.get(actual_index).unwrap_or("").trim();

        let mut out = record.clone();
        match classifier.classify(target, actual) {
            Ok(label) => {
                summary.labeled += 1;
                let mut pattern_cell = label.to_string();
                let mut resolved_cell = String::new();
                let mut resolution_failed = false;

                if options.resolve && label.needs_resolution() {
                    match classifier.resolve(target, actual, &label) {
                        Ok(resolution) => {
                            resolved_cell = resolution.label.to_string();
                            pattern_cell = resolved_cell.clone();
                        }
                        Err(err) if options.keep_going => {
                            summary.resolver_errors += 1;
                            eprintln!("{} row {row}: {err}", "Unresolved".yellow().bold());
                            resolved_cell = err.to_string();
                            resolution_failed = true;
                        }
                        Err(err) => {
                            return Err(err)
                                .with_context(|| format!("failed to resolve row {row}"));
                        }
                    }
                }

                out.push_field(&pattern_cell);
                out.push_field(&label.basic());
                if options.resolve {
                    out.push_field(&resolved_cell);
                }
                if options.score {
                    let cell = if resolution_failed {
                        String::new()
                    } else {
                        format!("{:.4}", score(&pattern_cell, &options.weights))
                    };
                    out.push_field(&cell);
                }
            }
            Err(err) => {
                summary.skipped += 1;
                eprintln!("{} row {row}: {err}", "Skipped".yellow().bold());
                out.push_field("");
                out.push_field("");
                if options.resolve {
                    out.push_field("");
                }
                if options.score {
                    out.push_field("");
                }
            }
        }
        writer
            .write_record(&out)
            .with_context(|| format!("failed to write row {row}"))?;

        if row % PROGRESS_EVERY == 0 {
            eprintln!("{} {row} rows", "Processed".cyan().bold());
        }
    }

    writer.flush().context("failed to flush output")?;
    Ok(summary)
}

/// File-path convenience over [`process`].
pub fn process_file<F: FeatureService>(
    classifier: &Classifier<F>,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let reader =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let writer =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    process(classifier, reader, writer, options)
}
