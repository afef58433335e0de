//! Primary error-pattern classifier.
//!
//! [`Classifier`] compares a consonant target (C, CC or CCC) against an
//! actual production and emits an [`ErrorLabel`]. Cluster targets get
//! per-position tags; when two actual segments claim the same target
//! position the label degrades to the ambiguous `{category}_other` form,
//! which the alignment resolver can pick up.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::features::{FeatureService, FeatureTable};
use crate::label::{Category, ErrorLabel, Outcome, PositionTag};
use crate::unit::{Cluster, InvalidInputError, Result, Segment, Tier};

/// Actual-side markers denoting a fully deleted production. `nan` covers
/// empty cells that arrive stringified from tabular data.
const DELETION_MARKERS: [&str; 2] = ["∅", "nan"];

/// Maximum number of target positions (C, CC, CCC).
pub const MAX_TARGET_SEGMENTS: usize = 3;

/// Error-pattern classifier over a feature system `F`.
///
/// # Examples
///
/// ```rust
/// use phonopatterns::prelude::*;
///
/// let classifier = Classifier::new();
/// assert_eq!(classifier.classify("k", "k").unwrap().to_string(), "accurate");
/// assert_eq!(
///     classifier.classify("bj", "b").unwrap().to_string(),
///     "reduction-C1pres-C2del"
/// );
/// assert_eq!(
///     classifier.classify("bj", "bw").unwrap().to_string(),
///     "substitution-C1pres-C2sub"
/// );
/// ```
#[derive(Debug)]
pub struct Classifier<F: FeatureService> {
    features: F,
}

impl Classifier<FeatureTable> {
    /// Classifier backed by the bundled feature table.
    pub fn new() -> Self {
        Classifier::with_features(FeatureTable::new())
    }
}

impl Default for Classifier<FeatureTable> {
    fn default() -> Self {
        Classifier::new()
    }
}

impl<F: FeatureService> Classifier<F> {
    /// Classifier backed by a caller-supplied feature system.
    pub fn with_features(features: F) -> Self {
        Classifier { features }
    }

    /// The underlying feature system.
    pub fn features(&self) -> &F {
        &self.features
    }

    /// Classifies one target/actual pair.
    ///
    /// The target must decompose into one to three segments; the actual
    /// side accepts anything, including the deletion markers `∅` and
    /// `nan`. A superscript schwa in the actual is read as a full `ə`.
    pub fn classify(&self, target: &str, actual: &str) -> Result<ErrorLabel> {
        self.classify_impl(target, actual, false)
    }

    /// Like [`classify`](Self::classify), but positional conflicts come
    /// back as an `OTHER_`-prefixed diagnostic label carrying the raw
    /// conflicting tags instead of collapsing to `{category}_other`.
    pub fn classify_debug(&self, target: &str, actual: &str) -> Result<ErrorLabel> {
        self.classify_impl(target, actual, true)
    }

    fn classify_impl(&self, target: &str, actual: &str, debug: bool) -> Result<ErrorLabel> {
        let actual = normalize_actual(actual);
        if DELETION_MARKERS.contains(&actual.as_ref()) {
            return Ok(ErrorLabel::flat(Category::Deletion));
        }

        if target.trim().is_empty() {
            return Err(InvalidInputError::EmptyTarget);
        }
        let target_cluster = Cluster::parse(target, Tier::Target, &self.features);
        if target_cluster.is_empty() {
            return Err(InvalidInputError::UnsegmentableTarget {
                input: target.to_string(),
            });
        }

        let actual_cluster = Cluster::parse(&actual, Tier::Actual, &self.features);
        if actual_cluster.is_empty() {
            return Ok(ErrorLabel::flat(Category::Deletion));
        }
        if target_cluster.symbols() == actual_cluster.symbols() {
            return Ok(ErrorLabel::flat(Category::Accurate));
        }
        if target_cluster.len() > MAX_TARGET_SEGMENTS {
            return Err(InvalidInputError::TargetTooLong {
                input: target.to_string(),
                len: target_cluster.len(),
            });
        }

        if target_cluster.len() == 1 {
            let category = if actual_cluster.len() == 1 {
                Category::Substitution
            } else {
                Category::Other
            };
            return Ok(ErrorLabel::flat(category));
        }

        let Some(category) = screen(&target_cluster, &actual_cluster) else {
            return Ok(ErrorLabel::flat(Category::Other));
        };

        let mut tags = self.attribute(&target_cluster, &actual_cluster);

        let mut coverage = [0usize; MAX_TARGET_SEGMENTS];
        for tag in &tags {
            coverage[tag.position] += 1;
        }
        if coverage.iter().any(|&n| n > 1) {
            if debug {
                return Ok(ErrorLabel::diagnostic(category, tags));
            }
            return Ok(ErrorLabel::ambiguous(category));
        }

        // uncovered positions count as deleted
        for position in 0..target_cluster.len() {
            if coverage[position] == 0 {
                tags.push(PositionTag::new(position, Outcome::Deleted));
            }
        }

        Ok(ErrorLabel::tagged(category, tags))
    }

    /// One tag per attributable actual segment. Epenthetic vowels (vowels
    /// in a 3+-segment actual) are skipped; literal symbol matches claim
    /// the first matching target position; everything else goes to the
    /// featurally nearest position.
    fn attribute(&self, target: &Cluster, actual: &Cluster) -> SmallVec<[PositionTag; 3]> {
        let mut tags = SmallVec::new();
        for segment in actual.iter() {
            if segment.is_vowel() && actual.len() > 2 {
                continue;
            }
            if let Some(position) = target.position_of(segment.symbol()) {
                tags.push(PositionTag::new(position, Outcome::Preserved));
                continue;
            }
            let position = self.nearest_position(target, segment);
            tags.push(PositionTag::new(position, Outcome::Substituted));
        }
        tags
    }

    /// Target position with the smallest strictly positive distance to
    /// `segment`, ties to the earlier position. Zero distances are
    /// excluded so a featurally identical (but differently written)
    /// segment cannot shadow a genuine substitution site; when every
    /// distance is zero the first position is charged.
    fn nearest_position(&self, target: &Cluster, segment: &Segment) -> usize {
        let mut best: Option<(usize, f64)> = None;
        for (position, candidate) in target.iter().enumerate() {
            let distance = self.features.distance(segment.symbol(), candidate.symbol());
            if distance > 0.0 && best.map_or(true, |(_, d)| distance < d) {
                best = Some((position, distance));
            }
        }
        best.map_or(0, |(position, _)| position)
    }
}

/// Category screens for cluster targets, in order; a later match overrides
/// an earlier one.
fn screen(target: &Cluster, actual: &Cluster) -> Option<Category> {
    let mut category = None;
    if actual.has_vowel() && actual.len() > 2 {
        category = Some(Category::Epenthesis);
    }
    if actual.len() < target.len() {
        category = Some(Category::Reduction);
    }
    if actual.len() == target.len() {
        category = Some(Category::Substitution);
    }
    category
}

/// A superscript schwa in the actual marks an epenthetic vowel; read it as
/// a full `ə` so it segments.
pub(crate) fn normalize_actual(actual: &str) -> Cow<'_, str> {
    if actual.contains('ᵊ') {
        Cow::Owned(actual.replace('ᵊ', "ə"))
    } else {
        Cow::Borrowed(actual)
    }
}
