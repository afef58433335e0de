//! End-to-end classification scenarios over the bundled feature table.

use phonopatterns::prelude::*;

fn classify(target: &str, actual: &str) -> String {
    Classifier::new()
        .classify(target, actual)
        .unwrap_or_else(|e| panic!("classify({target}, {actual}) failed: {e}"))
        .to_string()
}

#[test]
fn test_singleton_targets() {
    assert_eq!(classify("k", "k"), "accurate");
    assert_eq!(classify("k", "t"), "substitution");
    assert_eq!(classify("b", "p"), "substitution");
    assert_eq!(classify("k", "ts"), "other");
    assert_eq!(classify("k", "∅"), "deletion");
}

#[test]
fn test_cluster_accuracy_and_deletion() {
    assert_eq!(classify("bj", "bj"), "accurate");
    assert_eq!(classify("bj", "∅"), "deletion");
    assert_eq!(classify("bj", "nan"), "deletion");
    assert_eq!(classify("bj", ""), "deletion");
    // Whole-cluster deletion markers win before target validation.
    assert_eq!(classify("pstr", "∅"), "deletion");
}

#[test]
fn test_cluster_reduction() {
    assert_eq!(classify("bj", "b"), "reduction-C1pres-C2del");
    assert_eq!(classify("str", "st"), "reduction-C1pres-C2pres-C3del");
    assert_eq!(classify("ptk", "bm"), "reduction_other");
}

#[test]
fn test_cluster_substitution() {
    assert_eq!(classify("bj", "bw"), "substitution-C1pres-C2sub");
    assert_eq!(classify("bl", "bə"), "substitution-C1pres-C2sub");
    assert_eq!(classify("pl", "bm"), "substitution_other");
    assert_eq!(classify("rl", "ɾl"), "substitution_other");
    // A vowel skipped during attribution still yields a deletion tag for
    // the position it left uncovered.
    assert_eq!(classify("str", "sta"), "substitution-C1pres-C2pres-C3del");
    assert_eq!(classify("str", "səə"), "substitution-C1pres-C2del-C3del");
}

#[test]
fn test_cluster_epenthesis() {
    assert_eq!(classify("bl", "bəl"), "epenthesis-C1pres-C2pres");
    assert_eq!(classify("bl", "bᵊl"), "epenthesis-C1pres-C2pres");
    assert_eq!(classify("str", "sətr"), "epenthesis-C1pres-C2pres-C3pres");
    assert_eq!(classify("pl", "bəm"), "epenthesis_other");
}

#[test]
fn test_cluster_other() {
    assert_eq!(classify("bl", "brtk"), "other");
}

#[test]
fn test_unsupported_targets() {
    let classifier = Classifier::new();
    assert!(matches!(
        classifier.classify("", "b"),
        Err(InvalidInputError::EmptyTarget)
    ));
    assert!(matches!(
        classifier.classify("pstr", "b"),
        Err(InvalidInputError::TargetTooLong { .. })
    ));
    assert!(matches!(
        classifier.classify("??", "b"),
        Err(InvalidInputError::UnsegmentableTarget { .. })
    ));
}

#[test]
fn test_debug_mode_names_conflicting_attributions() {
    let classifier = Classifier::new();
    let label = classifier.classify_debug("pl", "bm").unwrap();
    assert_eq!(label.to_string(), "OTHER_substitution-C1sub-C1sub");
    assert!(label.is_ambiguous());
}

#[test]
fn test_tagged_labels_cover_every_target_position() {
    let classifier = Classifier::new();
    let table = FeatureTable::new();
    for (target, actual) in [
        ("bj", "b"),
        ("bj", "bw"),
        ("bl", "bəl"),
        ("str", "st"),
        ("str", "sta"),
        ("str", "səə"),
        ("str", "sətr"),
    ] {
        let label = classifier.classify(target, actual).unwrap();
        let positions: Vec<usize> = label.tags().iter().map(|t| t.position).collect();
        let expected: Vec<usize> = (0..table.segments(target).len()).collect();
        assert_eq!(positions, expected, "coverage for {target} vs {actual}");
    }
}

#[test]
fn test_label_round_trips_through_from_str() {
    for (target, actual) in [
        ("k", "k"),
        ("k", "t"),
        ("bj", "b"),
        ("bj", "bw"),
        ("bl", "bəl"),
        ("pl", "bm"),
        ("str", "st"),
    ] {
        let label = Classifier::new().classify(target, actual).unwrap();
        let rendered = label.to_string();
        let parsed: ErrorLabel = rendered.parse().unwrap();
        assert_eq!(parsed.to_string(), rendered);
    }
}

#[test]
fn test_basic_form_strips_position_tags() {
    let classifier = Classifier::new();
    let label = classifier.classify("bj", "bw").unwrap();
    assert_eq!(label.basic(), "substitution");
    let label = classifier.classify("pl", "bm").unwrap();
    assert_eq!(label.basic(), "substitution_other");
}
