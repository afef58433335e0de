//! Phonological units.
//!
//! A transcription decomposes into [`Segment`]s, grouped into a
//! [`Cluster`]. Segments keep their surface symbol (diacritics included),
//! the diacritic-stripped base, the feature vector, the [`Tier`] they
//! were parsed under, and their position inside the owning cluster.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use thiserror::Error;

use crate::diacritics;
use crate::features::{FeatureService, FeatureVector};

/// Side of the target/actual comparison a unit was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// The intended production.
    Target,
    /// The production actually heard.
    Actual,
}

impl Tier {
    /// Lowercase tier name.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Target => "target",
            Tier::Actual => "actual",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "target" => Ok(Tier::Target),
            "actual" => Ok(Tier::Actual),
            _ => Err(format!("unknown tier: {s}")),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Rejected target transcriptions.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// The target string is empty or whitespace.
    #[error("target transcription is empty")]
    EmptyTarget,

    /// Nothing in the target is a recognizable segment.
    #[error("no recognizable segments in target '{input}'")]
    UnsegmentableTarget { input: String },

    /// The target has more consonant positions than a triple cluster.
    #[error("target '{input}' has {len} segments; only C, CC and CCC targets are supported")]
    TargetTooLong { input: String, len: usize },
}

/// Result alias for input validation.
pub type Result<T> = std::result::Result<T, InvalidInputError>;

// ============================================================================
// Segment
// ============================================================================

/// One consonant or vowel occurrence inside a transcription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    symbol: String,
    base: String,
    diacritics: SmallVec<[char; 4]>,
    vector: FeatureVector,
    tier: Tier,
    position: Option<usize>,
}

impl Segment {
    /// Builds a free-standing segment (no cluster position).
    pub fn new(symbol: impl Into<String>, tier: Tier, vector: FeatureVector) -> Self {
        let symbol = symbol.into();
        let base = diacritics::strip(&symbol);
        let marks = diacritics::extract(&symbol).into_iter().collect();
        Segment {
            symbol,
            base,
            diacritics: marks,
            vector,
            tier,
            position: None,
        }
    }

    fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Surface form, diacritics included.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Surface form with diacritics stripped.
    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Diacritic marks in order of appearance.
    #[inline]
    pub fn diacritics(&self) -> &[char] {
        &self.diacritics
    }

    /// The articulatory description of this segment.
    #[inline]
    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    /// Index inside the owning cluster, when the segment came from one.
    #[inline]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Side of the comparison this segment was parsed from.
    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Whether the segment is vocalic (`+syl`), including syllabic
    /// consonants.
    #[inline]
    pub fn is_vowel(&self) -> bool {
        self.vector.is_syllabic()
    }

    /// Literal surface-symbol equality.
    #[inline]
    pub fn matches_symbol(&self, other: &Segment) -> bool {
        self.symbol == other.symbol
    }

    /// Feature-count dissimilarity to another segment.
    #[inline]
    pub fn distance_to(&self, other: &Segment) -> f64 {
        f64::from(self.vector.distance(&other.vector))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

// ============================================================================
// Cluster
// ============================================================================

/// An ordered run of segments parsed from one transcription.
///
/// Parsing never fails: unknown characters are dropped by the feature
/// service, so a fully unrecognizable input yields an empty cluster.
/// Length is not capped here; target arity is enforced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    text: String,
    tier: Tier,
    segments: SmallVec<[Segment; 4]>,
}

impl Cluster {
    /// Decomposes `text` using `service`. Every constituent segment
    /// inherits `tier`.
    pub fn parse<F: FeatureService + ?Sized>(text: &str, tier: Tier, service: &F) -> Self {
        let segments = service
            .segments(text)
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| {
                let vector = service.vector(&symbol).unwrap_or_default();
                Segment::new(symbol, tier, vector).with_position(i)
            })
            .collect();
        Cluster {
            text: text.to_string(),
            tier,
            segments,
        }
    }

    /// The raw transcription this cluster was parsed from.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment was recognized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segment at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Iterates the segments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Segment symbols in order.
    pub fn symbols(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.symbol()).collect()
    }

    /// Index of the first segment whose surface symbol equals `symbol`.
    pub fn position_of(&self, symbol: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.symbol() == symbol)
    }

    /// Whether any constituent is vocalic.
    pub fn has_vowel(&self) -> bool {
        self.segments.iter().any(|s| s.is_vowel())
    }

    /// Side of the comparison this cluster was parsed from.
    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment.symbol())?;
        }
        Ok(())
    }
}
