//! Invariants of the result table over arbitrary source rows.

use std::collections::BTreeSet;

use proptest::prelude::*;

use labreport_map::{ParameterExtractor, normalize_label, similarity};
use labreport_model::{CanonicalParameterSet, SourceTable};
use labreport_standards::builtin_parameter_set;

fn vocabulary() -> CanonicalParameterSet {
    builtin_parameter_set().expect("builtin vocabulary")
}

/// Labels drawn from canonical names, lightly mangled, or noise.
fn label_strategy() -> impl Strategy<Value = String> {
    let names: Vec<String> = vocabulary().names().map(str::to_string).collect();
    prop_oneof![
        proptest::sample::select(names.clone()),
        proptest::sample::select(names.clone()).prop_map(|n| format!("  {}  ", n.to_uppercase())),
        proptest::sample::select(names).prop_map(|n| n.replace(' ', "   ")),
        "[a-zA-Z ]{0,24}",
    ]
}

fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    (
        label_strategy(),
        "[a-z/]{0,4}",
        prop_oneof!["[0-9]{1,3}\\.[0-9]{1,3}", Just(String::new()), Just("  ".to_string())],
        0usize..3,
    )
        .prop_map(|(label, unit, value, extra)| {
            let mut row = vec![label, unit, value];
            row.extend(std::iter::repeat_n("extra".to_string(), extra));
            row
        })
}

fn tables_strategy() -> impl Strategy<Value = Vec<SourceTable>> {
    proptest::collection::vec(
        proptest::collection::vec(row_strategy(), 0..12).prop_map(SourceTable::new),
        0..3,
    )
}

proptest! {
    #[test]
    fn labels_are_canonical_and_unique(tables in tables_strategy()) {
        let set = vocabulary();
        let outcome = ParameterExtractor::new(&set).extract_tables(&tables);
        let mut seen = BTreeSet::new();
        for record in outcome.table.records() {
            prop_assert!(set.contains(&record.label), "fabricated label {}", record.label);
            prop_assert!(seen.insert(record.label.clone()), "duplicate label {}", record.label);
            prop_assert!(!record.value.trim().is_empty());
            prop_assert!(record.score >= 0.8);
        }
    }

    #[test]
    fn extraction_is_deterministic(tables in tables_strategy()) {
        let set = vocabulary();
        let extractor = ParameterExtractor::new(&set);
        let first = extractor.extract_tables(&tables);
        let second = extractor.extract_tables(&tables);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn first_occurrence_wins(
        index in 0usize..69,
        first in "[0-9]{1,3}",
        second in "[0-9]{1,3}",
    ) {
        let set = vocabulary();
        let name = set.get(index).expect("parameter").name.clone();
        let tables = vec![SourceTable::new(vec![
            vec![name.clone(), "x".to_string(), first.clone()],
            vec![name.to_uppercase(), "x".to_string(), second],
        ])];
        let outcome = ParameterExtractor::new(&set).extract_tables(&tables);
        prop_assert_eq!(outcome.table.value_of(&name), Some(first.as_str()));
    }

    #[test]
    fn below_threshold_labels_never_appear(label in "[a-zA-Z ]{0,24}", value in "[0-9]{1,3}") {
        let set = vocabulary();
        let normalized = normalize_label(&label);
        let best = set
            .names()
            .map(|name| similarity(&normalized, &name.to_lowercase()))
            .fold(0.0_f64, f64::max);
        let tables = vec![SourceTable::new(vec![vec![label, "x".to_string(), value]])];
        let outcome = ParameterExtractor::new(&set).extract_tables(&tables);
        if best < 0.8 {
            prop_assert!(outcome.table.is_empty());
        } else {
            prop_assert_eq!(outcome.table.len(), 1);
        }
    }
}
