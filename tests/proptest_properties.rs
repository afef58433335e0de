//! Property-based tests for the feature table and classifier.
//!
//! These verify that:
//!
//! 1. **Feature distance** is a symmetric, non-negative semi-metric
//!    bounded by the feature count.
//! 2. **Classification is total** over well-formed targets: every 1-3
//!    consonant target yields a label, every label survives a
//!    render/parse round trip, and tagged labels carry exactly one tag
//!    per target position.
//! 3. **Scores are bounded** for every label the classifier can emit.

use phonopatterns::features::FEATURE_COUNT;
use phonopatterns::prelude::*;
use proptest::prelude::*;

// Symbol generators over the bundled inventory

fn table_symbols(consonants_only: bool) -> Vec<String> {
    let table = FeatureTable::new();
    let mut symbols: Vec<String> = table
        .base_symbols()
        .into_iter()
        .filter(|s| {
            !consonants_only
                || table.vector(s).map(|v| !v.is_syllabic()).unwrap_or(false)
        })
        .map(str::to_string)
        .collect();
    symbols.sort();
    symbols
}

fn arb_symbol() -> impl Strategy<Value = String> {
    prop::sample::select(table_symbols(false))
}

fn arb_consonant() -> impl Strategy<Value = String> {
    prop::sample::select(table_symbols(true))
}

/// 1-3 consonants, so the target is always classifiable.
fn arb_target() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_consonant(), 1..=3).prop_map(|parts| parts.concat())
}

fn arb_actual() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_symbol(), 0..=4).prop_map(|parts| parts.concat())
}

// ============================================================================
// Feature Distance Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn distance_non_negative(a in arb_symbol(), b in arb_symbol()) {
        let table = FeatureTable::new();
        prop_assert!(table.distance(&a, &b) >= 0.0, "Distance must be non-negative");
    }

    #[test]
    fn distance_identity(a in arb_symbol()) {
        let table = FeatureTable::new();
        prop_assert_eq!(table.distance(&a, &a), 0.0, "Distance from a symbol to itself must be zero");
    }

    #[test]
    fn distance_symmetric(a in arb_symbol(), b in arb_symbol()) {
        let table = FeatureTable::new();
        prop_assert_eq!(
            table.distance(&a, &b),
            table.distance(&b, &a),
            "Distance must be symmetric: d(a,b) = d(b,a)"
        );
    }

    #[test]
    fn distance_bounded_by_feature_count(a in arb_symbol(), b in arb_symbol()) {
        let table = FeatureTable::new();
        prop_assert!(
            table.distance(&a, &b) <= FEATURE_COUNT as f64,
            "No two vectors can differ in more than every feature"
        );
    }

    #[test]
    fn distance_stable_across_repeated_lookups(a in arb_symbol(), b in arb_symbol()) {
        // Second lookup is served from the memo and must agree.
        let table = FeatureTable::new();
        let first = table.distance(&a, &b);
        let second = table.distance(&a, &b);
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Classifier Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn classification_is_total_over_consonant_targets(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        let label = classifier.classify(&target, &actual);
        prop_assert!(
            label.is_ok(),
            "classify({}, {}) should label every 1-3 consonant target: {:?}",
            target, actual, label
        );
    }

    #[test]
    fn labels_round_trip_through_from_str(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        let label = classifier.classify(&target, &actual).unwrap();
        let rendered = label.to_string();
        let parsed: ErrorLabel = rendered.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), rendered);
    }

    #[test]
    fn position_tags_are_ordered(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        let label = classifier.classify(&target, &actual).unwrap();
        let positions: Vec<usize> = label
            .tags()
            .iter()
            .map(|tag| tag.position)
            .collect();
        prop_assert!(
            positions.windows(2).all(|w| w[0] <= w[1]),
            "Tags must be sorted by position: {}",
            label
        );
    }

    #[test]
    fn tagged_labels_cover_each_position_once(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        let table = FeatureTable::new();
        let label = classifier.classify(&target, &actual).unwrap();
        let positions: Vec<usize> = label
            .tags()
            .iter()
            .map(|tag| tag.position)
            .collect();
        if !positions.is_empty() {
            let expected: Vec<usize> = (0..table.segments(&target).len()).collect();
            prop_assert_eq!(
                positions,
                expected,
                "Each target position must carry exactly one tag: {}",
                label
            );
        }
    }

    #[test]
    fn scores_are_bounded(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        let label = classifier.classify(&target, &actual).unwrap();
        let score = label.score(&WeightConfig::default());
        prop_assert!(
            (-0.3..=1.0).contains(&score),
            "Score {} out of range for label {}",
            score, label
        );
    }

    #[test]
    fn resolution_never_panics(
        target in arb_target(),
        actual in arb_actual()
    ) {
        let classifier = Classifier::new();
        match classifier.classify_resolved(&target, &actual) {
            Ok(resolution) => prop_assert!(!resolution.label.to_string().is_empty()),
            // Ties and over-long alignments are reported, not panicked on.
            Err(ResolveError::MultipleOptimalAlignments { .. }) => {}
            Err(ResolveError::AlignmentConstruction { .. }) => {}
            Err(err) => return Err(TestCaseError::fail(format!("unexpected error: {err}"))),
        }
    }
}
