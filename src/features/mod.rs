//! Articulatory feature system.
//!
//! Segments are described by ternary vectors over the 22 features of the
//! standard articulatory set (syllabic, sonorant, consonantal, ...). The
//! classifier is generic over a [`FeatureService`], the seam between the
//! labeling logic and whatever feature inventory backs it; [`table`]
//! provides the bundled implementation.
//!
//! Distances are feature-count dissimilarities: the number of features on
//! which two vectors disagree. Distinct segments may legitimately sit at
//! distance zero (e.g. a trill and a tap in a coarse inventory), which is
//! what the `sub[CHECK]` outcome exists to surface.

use std::fmt;
use std::ops::Index;

pub mod table;

pub use table::FeatureTable;

/// Number of features in a vector.
pub const FEATURE_COUNT: usize = 22;

/// Canonical feature order. Indices into a [`FeatureVector`] follow this
/// ordering.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "syl", "son", "cons", "cont", "delrel", "lat", "nas", "strid", "voi", "sg", "cg", "ant",
    "cor", "distr", "lab", "hi", "lo", "back", "round", "velaric", "tense", "long",
];

// ============================================================================
// Ternary feature values
// ============================================================================

/// A single feature value: specified plus, specified minus, or unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default)]
pub enum Ternary {
    /// The feature is present (`+`).
    Plus,
    /// The feature is absent (`-`).
    Minus,
    /// The feature does not apply to this segment (`0`).
    #[default]
    Unspecified,
}

impl Ternary {
    /// Single-character rendering used in compact vector displays.
    #[inline]
    pub fn symbol(&self) -> char {
        match self {
            Ternary::Plus => '+',
            Ternary::Minus => '-',
            Ternary::Unspecified => '0',
        }
    }

    /// Parses a single value symbol.
    #[inline]
    pub fn from_symbol(c: char) -> Option<Ternary> {
        match c {
            '+' => Some(Ternary::Plus),
            '-' => Some(Ternary::Minus),
            '0' => Some(Ternary::Unspecified),
            _ => None,
        }
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Feature vectors
// ============================================================================

/// The articulatory feature values of one segment.
///
/// Values are stored in [`FEATURE_NAMES`] order. Equality and hashing are
/// value-wise, so two segments with the same articulatory description
/// compare equal even when their surface symbols differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureVector([Ternary; FEATURE_COUNT]);

impl FeatureVector {
    /// Builds a vector from explicit values.
    pub const fn new(values: [Ternary; FEATURE_COUNT]) -> Self {
        FeatureVector(values)
    }

    /// Looks up a value by feature name.
    pub fn get(&self, name: &str) -> Option<Ternary> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.0[i])
    }

    /// Sets a value by feature name. Returns `false` when the name is not
    /// part of the feature set.
    pub fn set(&mut self, name: &str, value: Ternary) -> bool {
        match FEATURE_NAMES.iter().position(|&n| n == name) {
            Some(i) => {
                self.0[i] = value;
                true
            }
            None => false,
        }
    }

    /// All values in canonical order.
    #[inline]
    pub fn values(&self) -> &[Ternary; FEATURE_COUNT] {
        &self.0
    }

    /// Number of features on which `self` and `other` disagree.
    ///
    /// This is the raw dissimilarity underlying [`FeatureService::distance`]:
    /// symmetric, zero iff the vectors are value-identical, and at most
    /// [`FEATURE_COUNT`]. An unspecified value differs from both `+` and `-`.
    pub fn distance(&self, other: &FeatureVector) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count() as u32
    }

    /// Whether the segment is syllabic (`+syl`): a vowel or syllabic
    /// consonant.
    #[inline]
    pub fn is_syllabic(&self) -> bool {
        self.0[0] == Ternary::Plus
    }
}

impl Index<usize> for FeatureVector {
    type Output = Ternary;

    fn index(&self, index: usize) -> &Ternary {
        &self.0[index]
    }
}

impl fmt::Display for FeatureVector {
    /// Compact 22-character rendering, one symbol per feature in canonical
    /// order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.0 {
            write!(f, "{}", value.symbol())?;
        }
        Ok(())
    }
}

// ============================================================================
// Feature service
// ============================================================================

/// The feature-system seam.
///
/// Implementations decompose transcriptions into segments and describe each
/// segment articulatorily. The distance contract is load-bearing for the
/// classifier:
///
/// - `distance(a, b) == distance(b, a)`
/// - `distance(a, a) == 0.0`, and every distance is non-negative
/// - `distance(a, b) == 0.0` exactly when the two segments carry identical
///   feature values, which can happen for distinct symbols
pub trait FeatureService {
    /// Decomposes a transcription into an ordered list of segment symbols.
    ///
    /// Never fails: characters that are neither inventory bases nor
    /// diacritic marks are skipped, so unknown input simply yields fewer
    /// (possibly zero) segments. Diacritics attach to the preceding base.
    fn segments(&self, word: &str) -> Vec<String>;

    /// The feature vector for one segment symbol, diacritics applied.
    fn vector(&self, segment: &str) -> Option<FeatureVector>;

    /// Feature-count dissimilarity between two segment symbols.
    ///
    /// The default implementation compares vectors; a pair involving a
    /// symbol the service cannot describe is maximally distant.
    fn distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        match (self.vector(a), self.vector(b)) {
            (Some(x), Some(y)) => f64::from(x.distance(&y)),
            _ => FEATURE_COUNT as f64,
        }
    }
}

impl<S: FeatureService + ?Sized> FeatureService for &S {
    fn segments(&self, word: &str) -> Vec<String> {
        (**self).segments(word)
    }

    fn vector(&self, segment: &str) -> Option<FeatureVector> {
        (**self).vector(segment)
    }

    fn distance(&self, a: &str, b: &str) -> f64 {
        (**self).distance(a, b)
    }
}
