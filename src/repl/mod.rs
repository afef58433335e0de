//! Interactive REPL for phonopatterns
//!
//! Provides a Read-Eval-Print Loop for classifying target/actual pairs
//! interactively, with ambiguous labels re-resolved automatically.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use crate::classify::Classifier;
use crate::features::FeatureTable;
use crate::quantify::{score, WeightConfig};

/// REPL configuration
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string
    pub prompt: String,
    /// History file path
    pub history_file: Option<std::path::PathBuf>,
    /// Maximum history entries
    pub max_history: usize,
    /// Emit diagnostic labels for conflicting attributions
    pub debug: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "phono> ".to_string(),
            history_file: Some(
                dirs::home_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join(".phonopatterns_history"),
            ),
            max_history: 1000,
            debug: false,
        }
    }
}

/// Run the REPL until the user exits.
pub fn run(config: &ReplConfig) -> Result<()> {
    print_banner();

    let rustyline_config = Config::builder()
        .auto_add_history(true)
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .max_history_size(config.max_history)?
        .build();
    let mut editor = DefaultEditor::with_config(rustyline_config)?;

    if let Some(history_path) = &config.history_file {
        if history_path.exists() {
            let _ = editor.load_history(history_path);
        }
    }

    let classifier = Classifier::new();
    let weights = WeightConfig::default();
    let mut debug = config.debug;

    loop {
        let line = match editor.readline(&config.prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}: {:?}", "Readline error".red().bold(), err);
                break;
            }
        };

        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            "help" => print_help(),
            "debug" => {
                debug = !debug;
                println!("debug {}", if debug { "on" } else { "off" });
            }
            _ => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if let [target, actual] = tokens[..] {
                    classify_pair(&classifier, &weights, debug, target, actual);
                } else {
                    eprintln!(
                        "{}: expected a target and an actual, e.g. {}",
                        "Error".red().bold(),
                        "bj bw".cyan()
                    );
                }
            }
        }
    }

    if let Some(history_path) = &config.history_file {
        if let Err(e) = editor.save_history(history_path) {
            eprintln!("{}: Failed to save history: {}", "Warning".yellow(), e);
        }
    }

    Ok(())
}

fn classify_pair(
    classifier: &Classifier<FeatureTable>,
    weights: &WeightConfig,
    debug: bool,
    target: &str,
    actual: &str,
) {
    let result = if debug {
        classifier.classify_debug(target, actual)
    } else {
        classifier.classify(target, actual)
    };
    let label = match result {
        Ok(label) => label,
        Err(err) => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            return;
        }
    };
    println!("{label}");

    let mut scorable = label.to_string();
    if label.needs_resolution() {
        match classifier.resolve(target, actual, &label) {
            Ok(resolution) => {
                println!("{} {}", "resolved:".green().bold(), resolution.label);
                if let Some(alignment) = &resolution.alignment {
                    println!("{} {}", "alignment:".green(), alignment);
                }
                scorable = resolution.label.to_string();
            }
            Err(err) => eprintln!("{}: {}", "Warning".yellow(), err),
        }
    }
    println!("{} {:.4}", "score:".cyan().bold(), score(&scorable, weights));
}

fn print_banner() {
    println!();
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!(
        "{}",
        "   phonopatterns - Error-Pattern Classification"
            .bright_cyan()
            .bold()
    );
    println!(
        "{}",
        "═══════════════════════════════════════════════════════".bright_cyan()
    );
    println!();
    println!("  Version: {}", env!("CARGO_PKG_VERSION").green());
    println!("  Type {} for available commands", "'help'".yellow().bold());
    println!(
        "  Type {} or press {} to exit",
        "'exit'".yellow().bold(),
        "Ctrl+D".yellow().bold()
    );
    println!();
}

fn print_help() {
    println!("{}", "  Commands:".bold());
    println!("    {}   classify a pair, e.g. {}", "<target> <actual>".cyan(), "bj bw".cyan());
    println!("    {}               toggle diagnostic labels", "debug".cyan());
    println!("    {}                show this help", "help".cyan());
    println!("    {}                quit (also Ctrl+D)", "exit".cyan());
    println!();
}
