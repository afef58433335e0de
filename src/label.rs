//! Error labels.
//!
//! A classification result is either a flat category (`accurate`,
//! `deletion`, ...), a category with per-position tags
//! (`substitution-C1pres-C2sub`), an ambiguous form (`substitution_other`)
//! awaiting resolution, or a diagnostic dump of conflicting tags
//! (`OTHER_substitution-C1sub-C1sub`) produced in debug mode.
//!
//! Rendered tag lists are sorted for the resolved forms; diagnostics keep
//! encounter order so the conflict itself stays visible.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

type TagList = SmallVec<[PositionTag; 3]>;

// ============================================================================
// Categories
// ============================================================================

/// Top-level error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Actual matches the target segment for segment.
    Accurate,
    /// The whole target was dropped (or marked `∅`).
    Deletion,
    /// Segment-for-segment replacement.
    Substitution,
    /// A vowel was inserted into the cluster.
    Epenthesis,
    /// The cluster lost at least one position.
    Reduction,
    /// Extra non-vocalic material was inserted; produced only by the
    /// resolver as `insertion_other`.
    Insertion,
    /// None of the structural patterns applied.
    Other,
}

impl Category {
    /// Lowercase category name as it appears in labels.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Accurate => "accurate",
            Category::Deletion => "deletion",
            Category::Substitution => "substitution",
            Category::Epenthesis => "epenthesis",
            Category::Reduction => "reduction",
            Category::Insertion => "insertion",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accurate" => Ok(Category::Accurate),
            "deletion" => Ok(Category::Deletion),
            "substitution" => Ok(Category::Substitution),
            "epenthesis" => Ok(Category::Epenthesis),
            "reduction" => Ok(Category::Reduction),
            "insertion" => Ok(Category::Insertion),
            "other" => Ok(Category::Other),
            _ => Err(format!("unknown error category: {s}")),
        }
    }
}

// ============================================================================
// Per-position outcomes
// ============================================================================

/// What happened at one target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The target segment surfaced literally.
    Preserved,
    /// A different segment surfaced at this position.
    Substituted,
    /// Nothing surfaced at this position.
    Deleted,
    /// The aligned segment is featurally identical to the target but its
    /// symbol differs; the call needs manual review.
    SubstitutedCheck,
}

impl Outcome {
    /// Tag suffix as it appears after the position ordinal.
    pub fn suffix(&self) -> &'static str {
        match self {
            Outcome::Preserved => "pres",
            Outcome::Substituted => "sub",
            Outcome::Deleted => "del",
            Outcome::SubstitutedCheck => "sub[CHECK]",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pres" => Ok(Outcome::Preserved),
            "sub" => Ok(Outcome::Substituted),
            "del" => Ok(Outcome::Deleted),
            "sub[CHECK]" => Ok(Outcome::SubstitutedCheck),
            _ => Err(format!("unknown position outcome: {s}")),
        }
    }
}

/// An outcome bound to a zero-based target position. Renders one-based:
/// `C1pres`, `C2sub`, `C3del`, `C2sub[CHECK]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionTag {
    /// Zero-based target position.
    pub position: usize,
    /// What happened there.
    pub outcome: Outcome,
}

impl PositionTag {
    /// Binds an outcome to a zero-based position.
    pub fn new(position: usize, outcome: Outcome) -> Self {
        PositionTag { position, outcome }
    }

    /// Sort key matching the rendered form's lexicographic order.
    fn sort_key(&self) -> (usize, &'static str) {
        (self.position, self.outcome.suffix())
    }
}

impl fmt::Display for PositionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}{}", self.position + 1, self.outcome)
    }
}

impl FromStr for PositionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('C')
            .ok_or_else(|| format!("invalid position tag: {s}"))?;
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, suffix) = rest.split_at(digits_end);
        let ordinal: usize = digits
            .parse()
            .map_err(|_| format!("invalid position in tag: {s}"))?;
        if ordinal == 0 {
            return Err(format!("position tags are one-based: {s}"));
        }
        let outcome: Outcome = suffix.parse()?;
        Ok(PositionTag::new(ordinal - 1, outcome))
    }
}

// ============================================================================
// Error labels
// ============================================================================

/// A complete classification result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorLabel {
    /// A category with no positional structure.
    Flat(Category),
    /// A category with one tag per covered target position, sorted.
    Tagged { category: Category, tags: TagList },
    /// Positional attribution conflicted; renders `{category}_other`.
    Ambiguous(Category),
    /// Debug twin of [`ErrorLabel::Ambiguous`]: the conflicting raw tags in
    /// encounter order, duplicates intact.
    Diagnostic { category: Category, tags: TagList },
}

impl ErrorLabel {
    /// A label with no positional structure.
    pub fn flat(category: Category) -> Self {
        ErrorLabel::Flat(category)
    }

    /// Builds a tagged label, sorting the tags into rendered order.
    pub fn tagged(category: Category, tags: impl IntoIterator<Item = PositionTag>) -> Self {
        let mut tags: TagList = tags.into_iter().collect();
        tags.sort_by_key(|t| t.sort_key());
        ErrorLabel::Tagged { category, tags }
    }

    /// An unresolved `{category}_other` label.
    pub fn ambiguous(category: Category) -> Self {
        ErrorLabel::Ambiguous(category)
    }

    /// Builds a diagnostic label; tag order is preserved as given.
    pub fn diagnostic(category: Category, tags: impl IntoIterator<Item = PositionTag>) -> Self {
        ErrorLabel::Diagnostic {
            category,
            tags: tags.into_iter().collect(),
        }
    }

    /// The top-level category, whatever the label's shape.
    pub fn category(&self) -> Category {
        match self {
            ErrorLabel::Flat(category)
            | ErrorLabel::Ambiguous(category)
            | ErrorLabel::Tagged { category, .. }
            | ErrorLabel::Diagnostic { category, .. } => *category,
        }
    }

    /// Positional tags; empty for flat and ambiguous labels.
    pub fn tags(&self) -> &[PositionTag] {
        match self {
            ErrorLabel::Tagged { tags, .. } | ErrorLabel::Diagnostic { tags, .. } => tags,
            _ => &[],
        }
    }

    /// Whether positional attribution conflicted.
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            ErrorLabel::Ambiguous(_) | ErrorLabel::Diagnostic { .. }
        )
    }

    /// Whether the label is one the alignment resolver accepts: any
    /// ambiguous form, plus the flat `other`.
    pub fn needs_resolution(&self) -> bool {
        self.is_ambiguous() || matches!(self, ErrorLabel::Flat(Category::Other))
    }

    /// The category chunk of the rendered label, e.g. `substitution` for
    /// `substitution-C1pres-C2sub` but `substitution_other` for the
    /// ambiguous form.
    pub fn basic(&self) -> String {
        let rendered = self.to_string();
        match rendered.split_once('-') {
            Some((head, _)) => head.to_string(),
            None => rendered,
        }
    }
}

impl fmt::Display for ErrorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLabel::Flat(category) => f.write_str(category.name()),
            ErrorLabel::Ambiguous(category) => write!(f, "{}_other", category.name()),
            ErrorLabel::Tagged { category, tags } => {
                f.write_str(category.name())?;
                for tag in tags {
                    write!(f, "-{tag}")?;
                }
                Ok(())
            }
            ErrorLabel::Diagnostic { category, tags } => {
                write!(f, "OTHER_{}", category.name())?;
                for tag in tags {
                    write!(f, "-{tag}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ErrorLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty error label".to_string());
        }
        if let Some(rest) = s.strip_prefix("OTHER_") {
            let mut chunks = rest.split('-');
            let category: Category = chunks
                .next()
                .ok_or_else(|| "missing category".to_string())?
                .parse()?;
            let tags = chunks
                .map(PositionTag::from_str)
                .collect::<Result<TagList, _>>()?;
            return Ok(ErrorLabel::Diagnostic { category, tags });
        }
        if let Some(prefix) = s.strip_suffix("_other") {
            let category: Category = prefix.parse()?;
            return Ok(ErrorLabel::Ambiguous(category));
        }
        let mut chunks = s.split('-');
        let category: Category = chunks
            .next()
            .ok_or_else(|| "missing category".to_string())?
            .parse()?;
        let tags = chunks
            .map(PositionTag::from_str)
            .collect::<Result<TagList, _>>()?;
        if tags.is_empty() {
            Ok(ErrorLabel::Flat(category))
        } else {
            Ok(ErrorLabel::tagged(category, tags))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            Category::Accurate,
            Category::Deletion,
            Category::Substitution,
            Category::Epenthesis,
            Category::Reduction,
            Category::Insertion,
            Category::Other,
        ] {
            assert_eq!(category.name().parse::<Category>(), Ok(category));
        }
        assert!("distortion".parse::<Category>().is_err());
    }

    #[test]
    fn test_outcome_round_trip() {
        for outcome in [
            Outcome::Preserved,
            Outcome::Substituted,
            Outcome::Deleted,
            Outcome::SubstitutedCheck,
        ] {
            assert_eq!(outcome.suffix().parse::<Outcome>(), Ok(outcome));
        }
        assert!("ins".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_position_tag_rendering() {
        let tag = PositionTag::new(1, Outcome::Substituted);
        assert_eq!(tag.to_string(), "C2sub");
        assert_eq!("C2sub".parse::<PositionTag>(), Ok(tag));
        assert_eq!(
            "C3sub[CHECK]".parse::<PositionTag>(),
            Ok(PositionTag::new(2, Outcome::SubstitutedCheck))
        );
    }

    #[test]
    fn test_position_tag_rejects_malformed() {
        assert!("C0pres".parse::<PositionTag>().is_err());
        assert!("Cpres".parse::<PositionTag>().is_err());
        assert!("2sub".parse::<PositionTag>().is_err());
        assert!("C1gone".parse::<PositionTag>().is_err());
    }

    #[test]
    fn test_tagged_sorts_tags() {
        let label = ErrorLabel::tagged(
            Category::Reduction,
            [
                PositionTag::new(2, Outcome::Deleted),
                PositionTag::new(0, Outcome::Preserved),
                PositionTag::new(1, Outcome::Preserved),
            ],
        );
        assert_eq!(label.to_string(), "reduction-C1pres-C2pres-C3del");
    }

    #[test]
    fn test_diagnostic_preserves_order() {
        let label = ErrorLabel::diagnostic(
            Category::Substitution,
            [
                PositionTag::new(0, Outcome::Substituted),
                PositionTag::new(0, Outcome::Substituted),
            ],
        );
        assert_eq!(label.to_string(), "OTHER_substitution-C1sub-C1sub");
    }

    #[test]
    fn test_ambiguous_rendering() {
        assert_eq!(
            ErrorLabel::ambiguous(Category::Epenthesis).to_string(),
            "epenthesis_other"
        );
        assert_eq!(
            ErrorLabel::ambiguous(Category::Insertion).to_string(),
            "insertion_other"
        );
    }

    #[test]
    fn test_label_round_trip() {
        for rendered in [
            "accurate",
            "deletion",
            "substitution",
            "other",
            "substitution_other",
            "epenthesis_other",
            "reduction-C1pres-C2del",
            "substitution-C1sub[CHECK]-C2pres",
            "epenthesis-C1pres-C2pres-C3pres",
            "OTHER_epenthesis-C1sub-C1sub",
        ] {
            let label: ErrorLabel = rendered.parse().unwrap();
            assert_eq!(label.to_string(), rendered);
        }
    }

    #[test]
    fn test_basic_collapse() {
        let tagged: ErrorLabel = "substitution-C1pres-C2sub".parse().unwrap();
        assert_eq!(tagged.basic(), "substitution");
        let ambiguous: ErrorLabel = "substitution_other".parse().unwrap();
        assert_eq!(ambiguous.basic(), "substitution_other");
        let flat: ErrorLabel = "accurate".parse().unwrap();
        assert_eq!(flat.basic(), "accurate");
    }

    #[test]
    fn test_needs_resolution() {
        assert!(ErrorLabel::ambiguous(Category::Substitution).needs_resolution());
        assert!(ErrorLabel::flat(Category::Other).needs_resolution());
        assert!(!ErrorLabel::flat(Category::Accurate).needs_resolution());
        let tagged: ErrorLabel = "reduction-C1pres-C2del".parse().unwrap();
        assert!(!tagged.needs_resolution());
    }

    #[test]
    fn test_tags_accessor() {
        let label: ErrorLabel = "substitution-C1pres-C2sub".parse().unwrap();
        assert_eq!(label.tags().len(), 2);
        assert_eq!(label.tags()[0], PositionTag::new(0, Outcome::Preserved));
        assert!(ErrorLabel::flat(Category::Deletion).tags().is_empty());
    }

    #[test]
    fn test_category_accessor() {
        let label: ErrorLabel = "epenthesis_other".parse().unwrap();
        assert_eq!(label.category(), Category::Epenthesis);
    }
}
