//! Combinatorial alignment resolver.
//!
//! Ambiguous labels (`{category}_other`) mean the per-position attribution
//! found two actual segments competing for one target position. For
//! two-segment targets the resolver settles the competition globally: it
//! builds the full actual-by-target distance matrix, enumerates every
//! assignment of actual segments to target positions, and keeps the
//! cheapest one. A tie between assignments is unresolvable and surfaces as
//! an error rather than an arbitrary pick.
//!
//! Patterns outside the resolver's reach (triple-cluster reductions,
//! oversized productions) pass through unresolved, except that a
//! production with more than two non-epenthetic segments is relabeled
//! `insertion_other`.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::classify::{normalize_actual, Classifier};
use crate::features::FeatureService;
use crate::label::{Category, ErrorLabel, Outcome, PositionTag};
use crate::unit::{Cluster, InvalidInputError, Segment, Tier};

/// Cost discount for keeping an actual segment at its own position when
/// both sides have the same number of segments. Cells never go below zero.
const DIAGONAL_BONUS: f64 = 0.1;

/// Resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Two assignments tie on total cost; the pair cannot be aligned
    /// without an arbitrary choice.
    #[error("multiple ideal alignments found for '{target}' vs '{actual}'")]
    MultipleOptimalAlignments { target: String, actual: String },

    /// Two candidate assignments chose the same actual row for the same
    /// target column.
    #[error("alignment construction failed for '{target}' vs '{actual}': {detail}")]
    AlignmentConstruction {
        target: String,
        actual: String,
        detail: String,
    },

    /// The target itself was rejected.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}

/// Result alias for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// One aligned target/actual pair, with the (bonus-adjusted) matrix cell
/// that chose it.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// The target-side segment at this position.
    pub target: Segment,
    /// The actual segment assigned to it.
    pub actual: Segment,
    /// The matrix cell that chose this pairing.
    pub distance: f64,
}

/// A winning assignment, one pair per target position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pairs: Vec<AlignedPair>,
}

impl Alignment {
    fn new(pairs: Vec<AlignedPair>) -> Self {
        Alignment { pairs }
    }

    /// The aligned pairs in target order.
    pub fn pairs(&self) -> &[AlignedPair] {
        &self.pairs
    }

    /// Number of aligned pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the alignment is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates the pairs in target order.
    pub fn iter(&self) -> impl Iterator<Item = &AlignedPair> {
        self.pairs.iter()
    }

    /// Sum of the chosen cells.
    pub fn total_cost(&self) -> f64 {
        self.pairs.iter().map(|p| p.distance).sum()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}→{} ({:.2})",
                pair.actual.symbol(),
                pair.target.symbol(),
                pair.distance
            )?;
        }
        Ok(())
    }
}

/// Resolver output: the (possibly rewritten) label, plus the alignment
/// when one was actually computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The label after resolution (the prior label for pass-throughs).
    pub label: ErrorLabel,
    /// The winning alignment, absent for pass-throughs.
    pub alignment: Option<Alignment>,
}

impl Resolution {
    fn resolved(label: ErrorLabel, alignment: Alignment) -> Self {
        Resolution {
            label,
            alignment: Some(alignment),
        }
    }

    fn unresolved(label: ErrorLabel) -> Self {
        Resolution {
            label,
            alignment: None,
        }
    }

    /// Whether an alignment was computed (as opposed to a pass-through).
    pub fn is_resolved(&self) -> bool {
        self.alignment.is_some()
    }
}

impl<F: FeatureService> Classifier<F> {
    /// Attempts to disambiguate an `_other` label by optimal alignment.
    ///
    /// Labels that do not involve `other` pass through untouched, as do
    /// patterns the pairwise resolver cannot cover (see module docs).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use phonopatterns::prelude::*;
    ///
    /// let classifier = Classifier::new();
    /// let prior = classifier.classify("pl", "bm").unwrap();
    /// assert_eq!(prior.to_string(), "substitution_other");
    ///
    /// let resolution = classifier.resolve("pl", "bm", &prior).unwrap();
    /// assert_eq!(resolution.label.to_string(), "substitution-C1sub-C2sub");
    /// assert!(resolution.is_resolved());
    /// ```
    pub fn resolve(&self, target: &str, actual: &str, prior: &ErrorLabel) -> Result<Resolution> {
        if !prior.needs_resolution() {
            return Ok(Resolution::unresolved(prior.clone()));
        }
        // reduction_other only arises for triple targets, which the
        // pairwise resolver does not cover
        if prior.category() == Category::Reduction {
            return Ok(Resolution::unresolved(prior.clone()));
        }

        let target_cluster = Cluster::parse(target, Tier::Target, self.features());
        if target_cluster.is_empty() {
            let err = if target.trim().is_empty() {
                InvalidInputError::EmptyTarget
            } else {
                InvalidInputError::UnsegmentableTarget {
                    input: target.to_string(),
                }
            };
            return Err(err.into());
        }
        if target_cluster.len() != 2 {
            return Ok(Resolution::unresolved(prior.clone()));
        }

        let actual_norm = normalize_actual(actual);
        let actual_cluster = Cluster::parse(&actual_norm, Tier::Actual, self.features());
        let all: Vec<&Segment> = actual_cluster.iter().collect();

        let category = prior.category();
        let (working, rows) = if prior.is_ambiguous() && category == Category::Epenthesis {
            let consonants: Vec<&Segment> =
                all.iter().copied().filter(|s| !s.is_vowel()).collect();
            if consonants.len() > 2 {
                return Ok(Resolution::unresolved(prior.clone()));
            }
            (Category::Epenthesis, consonants)
        } else if actual_cluster.len() > 2 {
            return Ok(Resolution::unresolved(ErrorLabel::ambiguous(
                Category::Insertion,
            )));
        } else if prior.is_ambiguous()
            && category == Category::Substitution
            && actual_cluster.len() == 2
        {
            (Category::Substitution, all)
        } else {
            return Ok(Resolution::unresolved(prior.clone()));
        };
        if rows.len() != 2 {
            return Ok(Resolution::unresolved(prior.clone()));
        }
        let columns: Vec<&Segment> = target_cluster.iter().collect();

        // distance matrix, rows = actual segments, columns = target
        // positions; both sides hold exactly two segments here
        let mut matrix = [[0.0f64; 2]; 2];
        for (r, aseg) in rows.iter().enumerate() {
            for (c, tseg) in columns.iter().enumerate() {
                matrix[r][c] = self.features().distance(aseg.symbol(), tseg.symbol());
            }
        }
        for k in 0..2 {
            matrix[k][k] = (matrix[k][k] - DIAGONAL_BONUS).max(0.0);
        }

        // every assignment of one distinct actual row per target column
        let mut assignments: Vec<[usize; 2]> = Vec::new();
        for first in 0..2 {
            for second in 0..2 {
                if first != second {
                    assignments.push([first, second]);
                }
            }
        }
        // candidate assignments must differ in every column; a shared
        // actual row at the same position means the enumeration is broken
        for option in assignments.iter().skip(1) {
            for column in 0..2 {
                if option[column] == assignments[0][column] {
                    return Err(ResolveError::AlignmentConstruction {
                        target: target.to_string(),
                        actual: actual.to_string(),
                        detail: format!(
                            "candidate assignments share actual row {} at column {}",
                            option[column], column
                        ),
                    });
                }
            }
        }

        let costs: Vec<f64> = assignments
            .iter()
            .map(|assignment| matrix[assignment[0]][0] + matrix[assignment[1]][1])
            .collect();
        let mut best = 0;
        for (i, cost) in costs.iter().enumerate() {
            if cost.total_cmp(&costs[best]) == Ordering::Less {
                best = i;
            }
        }
        let ties = costs
            .iter()
            .filter(|cost| cost.total_cmp(&costs[best]) == Ordering::Equal)
            .count();
        if ties > 1 {
            return Err(ResolveError::MultipleOptimalAlignments {
                target: target.to_string(),
                actual: actual.to_string(),
            });
        }

        let mut tags: SmallVec<[PositionTag; 3]> = SmallVec::new();
        let mut pairs = Vec::with_capacity(2);
        for (column, &row) in assignments[best].iter().enumerate() {
            let tseg = columns[column];
            let aseg = rows[row];
            let cell = matrix[row][column];
            let outcome = if cell > 0.0 {
                Outcome::Substituted
            } else if aseg.symbol() == tseg.symbol() {
                Outcome::Preserved
            } else {
                Outcome::SubstitutedCheck
            };
            tags.push(PositionTag::new(column, outcome));
            pairs.push(AlignedPair {
                target: tseg.clone(),
                actual: aseg.clone(),
                distance: cell,
            });
        }

        Ok(Resolution::resolved(
            ErrorLabel::tagged(working, tags),
            Alignment::new(pairs),
        ))
    }

    /// Classifies and, when the label is ambiguous, resolves in one step.
    pub fn classify_resolved(&self, target: &str, actual: &str) -> Result<Resolution> {
        let label = self.classify(target, actual)?;
        if label.needs_resolution() {
            self.resolve(target, actual, &label)
        } else {
            Ok(Resolution::unresolved(label))
        }
    }
}
