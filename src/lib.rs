//! # phonopatterns
//!
//! Phonological error-pattern classification for consonant targets.
//!
//! Given a target transcription and the transcription a speaker actually
//! produced, the classifier compares the two segment by segment over an
//! articulatory feature table and emits a structured error label: the
//! broad category (accurate, deletion, substitution, epenthesis,
//! reduction) plus per-position outcome tags for cluster targets.
//!
//! ## Example
//!
//! ```rust
//! use phonopatterns::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = Classifier::new();
//!
//! let label = classifier.classify("bj", "bw")?;
//! assert_eq!(label.to_string(), "substitution-C1pres-C2sub");
//!
//! // Ambiguous labels can be re-resolved by exhaustive alignment.
//! let label = classifier.classify("pl", "bm")?;
//! assert_eq!(label.to_string(), "substitution_other");
//! let resolution = classifier.resolve("pl", "bm", &label)?;
//! assert_eq!(resolution.label.to_string(), "substitution-C1sub-C2sub");
//!
//! let score = resolution.label.score(&WeightConfig::default());
//! assert!((score - 0.6).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod diacritics;
pub mod features;
pub mod label;
pub mod quantify;
pub mod resolve;
pub mod unit;

/// Batch CSV processing
#[cfg(feature = "cli")]
pub mod batch;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Interactive REPL for exploring classifications
#[cfg(feature = "cli")]
pub mod repl;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::classify::{Classifier, MAX_TARGET_SEGMENTS};
    pub use crate::features::{FeatureService, FeatureTable, FeatureVector, Ternary};
    pub use crate::label::{Category, ErrorLabel, Outcome, PositionTag};
    pub use crate::quantify::{score, WeightConfig};
    pub use crate::resolve::{AlignedPair, Alignment, ResolveError, Resolution};
    pub use crate::unit::{Cluster, InvalidInputError, Segment, Tier};

    #[cfg(feature = "cli")]
    pub use crate::batch::{BatchOptions, BatchSummary};
}
