//! CLI interface for phonopatterns
//!
//! Provides command-line utilities for classifying single pairs and CSV files.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
