//! Numeric scoring of error labels.
//!
//! Scores are driven by the rendered label text, so the quantifier works
//! for labels coming from this crate and for label strings read back from
//! tabular data alike. Weights are configurable; the defaults encode the
//! usual clinical convention (a correct production is 1.0, a deletion 0.0,
//! a substitution 0.6, epenthesis costs 0.3).

use crate::label::ErrorLabel;

#[cfg(feature = "serialization")]
use thiserror::Error;

/// Scoring weights.
///
/// `full_*` weights apply to whole-target labels, the `*_segment` weights
/// to individual position tags, and `epenthesis_penalty` is added once
/// whenever the category is epenthetic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WeightConfig {
    /// Score of an `accurate` production.
    pub full_correct: f64,
    /// Score of a whole-target `deletion`.
    pub full_deletion: f64,
    /// Score of a whole-target `substitution` (resolved or not).
    pub full_substitution: f64,
    /// Per-tag contribution of a preserved position.
    pub correct_segment: f64,
    /// Per-tag contribution of a substituted position.
    pub substitution_segment: f64,
    /// Flat adjustment applied once to epenthetic labels.
    pub epenthesis_penalty: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        WeightConfig {
            full_correct: 1.0,
            full_deletion: 0.0,
            full_substitution: 0.6,
            correct_segment: 1.0,
            substitution_segment: 0.6,
            epenthesis_penalty: -0.3,
        }
    }
}

/// Weight-file problems.
#[cfg(feature = "serialization")]
#[derive(Debug, Error)]
pub enum WeightConfigError {
    /// The file could not be read.
    #[error("failed to read weight file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid weight JSON.
    #[error("failed to parse weight file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(feature = "serialization")]
impl WeightConfig {
    /// Loads weights from a JSON file. Keys absent from the file keep
    /// their default values.
    pub fn load(path: &std::path::Path) -> Result<Self, WeightConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Scores a rendered label.
///
/// Whole-target labels short-circuit to their `full_*` weight
/// (`epenthesis_other` counts as a correct production carrying the
/// penalty). Tagged labels accumulate per position: each `pres` tag
/// contributes `correct_segment` and each `sub` tag (including
/// `sub[CHECK]`) contributes `substitution_segment`, both normalized by
/// the tag count times `correct_segment`; `del` tags contribute nothing
/// but still count toward the normalization.
///
/// # Examples
///
/// ```rust
/// use phonopatterns::prelude::*;
///
/// let weights = WeightConfig::default();
/// assert_eq!(score("accurate", &weights), 1.0);
/// assert_eq!(score("reduction-C1pres-C2del", &weights), 0.5);
/// assert!((score("substitution-C1pres-C2sub", &weights) - 0.8).abs() < 1e-9);
/// ```
pub fn score(label: &str, weights: &WeightConfig) -> f64 {
    let label = label.trim();
    match label {
        "accurate" => return weights.full_correct,
        "deletion" => return weights.full_deletion,
        "substitution" | "substitution_other" => return weights.full_substitution,
        "epenthesis_other" => return weights.full_correct + weights.epenthesis_penalty,
        _ => {}
    }

    let mut chunks = label.split('-');
    let category = chunks.next().unwrap_or("");
    let tags: Vec<&str> = chunks.collect();
    let denominator = tags.len().max(1) as f64 * weights.correct_segment;

    let mut total = 0.0;
    if category.starts_with("epenthesis") {
        total += weights.epenthesis_penalty;
    }
    for tag in &tags {
        if tag.contains("pres") {
            total += weights.correct_segment / denominator;
        }
        if tag.contains("sub") {
            total += weights.substitution_segment / denominator;
        }
    }
    total
}

impl ErrorLabel {
    /// Scores the label via its rendered form.
    pub fn score(&self, weights: &WeightConfig) -> f64 {
        score(&self.to_string(), weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_whole_target_shortcuts() {
        let w = WeightConfig::default();
        assert_eq!(score("accurate", &w), 1.0);
        assert_eq!(score("deletion", &w), 0.0);
        assert_eq!(score("substitution", &w), 0.6);
        assert_eq!(score("substitution_other", &w), 0.6);
        assert!(close(score("epenthesis_other", &w), 0.7));
    }

    #[test]
    fn test_tagged_accumulation() {
        let w = WeightConfig::default();
        assert_eq!(score("reduction-C1pres-C2del", &w), 0.5);
        assert!(close(score("substitution-C1pres-C2sub", &w), 0.8));
        assert!(close(score("epenthesis-C1pres-C2pres", &w), 0.7));
        assert!(close(score("reduction-C1pres-C2pres-C3del", &w), 2.0 / 3.0));
    }

    #[test]
    fn test_check_tags_score_as_substitutions() {
        let w = WeightConfig::default();
        assert!(close(
            score("substitution-C1sub[CHECK]-C2pres", &w),
            score("substitution-C1sub-C2pres", &w)
        ));
    }

    #[test]
    fn test_unstructured_labels_score_zero() {
        let w = WeightConfig::default();
        assert_eq!(score("other", &w), 0.0);
        assert_eq!(score("insertion_other", &w), 0.0);
        assert_eq!(score("", &w), 0.0);
    }

    #[test]
    fn test_label_method_matches_free_function() {
        let w = WeightConfig::default();
        let label: ErrorLabel = "epenthesis-C1pres-C2pres".parse().unwrap();
        assert!(close(label.score(&w), score("epenthesis-C1pres-C2pres", &w)));
    }

    #[test]
    fn test_custom_weights() {
        let w = WeightConfig {
            full_substitution: 0.5,
            substitution_segment: 0.4,
            ..WeightConfig::default()
        };
        assert_eq!(score("substitution", &w), 0.5);
        assert!(close(score("substitution-C1pres-C2sub", &w), 0.5 + 0.2));
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let parsed: WeightConfig = serde_json::from_str(r#"{"full_substitution": 0.5}"#).unwrap();
        assert_eq!(parsed.full_substitution, 0.5);
        assert_eq!(parsed.full_correct, 1.0);
        assert_eq!(parsed.epenthesis_penalty, -0.3);
    }
}
