//! Similarity scoring and thresholded single-best resolution.
//!
//! Similarity is the normalized Indel ratio `2 * LCS / (|a| + |b|)` over
//! characters, the same 2M/T family as a sequence-matcher ratio.

use rapidfuzz::distance::indel;
use serde::{Deserialize, Serialize};

use labreport_model::TieBreak;

/// Similarity of two already-normalized strings, in `[0, 1]`.
pub fn similarity(left: &str, right: &str) -> f64 {
    if left == right {
        return 1.0;
    }
    indel::normalized_similarity(left.chars(), right.chars())
}

/// A canonical entry considered for a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Declared position in the parameter set.
    pub index: usize,
    /// Canonical spelling.
    pub name: String,
    pub score: f64,
}

/// Outcome of resolving a single label.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched(Candidate),
    /// Nothing reached the threshold; `best` is the closest entry, if any.
    BelowThreshold { best: Option<Candidate> },
    /// Several entries share the best score and ties are rejected.
    Tied { candidates: Vec<Candidate> },
}

impl Resolution {
    pub fn matched(&self) -> Option<&Candidate> {
        match self {
            Self::Matched(candidate) => Some(candidate),
            _ => None,
        }
    }
}

/// Scans `keys` in declared order and picks the first maximal score.
///
/// `keys` are the lower-cased canonical names; `names` the declared spellings
/// at the same positions.
pub(crate) fn best_match(
    label: &str,
    keys: &[String],
    names: &[&str],
    threshold: f64,
    tie_break: TieBreak,
) -> Resolution {
    let mut best: Option<(usize, f64)> = None;
    let mut tied: Vec<usize> = Vec::new();
    for (index, key) in keys.iter().enumerate() {
        let score = similarity(label, key);
        match best {
            Some((_, top)) if score > top => {
                best = Some((index, score));
                tied.clear();
            }
            Some((_, top)) if score == top => tied.push(index),
            Some(_) => {}
            None => best = Some((index, score)),
        }
    }
    let candidate = |index: usize, score: f64| Candidate {
        index,
        name: names[index].to_string(),
        score,
    };
    let Some((index, score)) = best else {
        return Resolution::BelowThreshold { best: None };
    };
    if score < threshold {
        return Resolution::BelowThreshold {
            best: Some(candidate(index, score)),
        };
    }
    if !tied.is_empty() && tie_break == TieBreak::Reject {
        let mut candidates = vec![candidate(index, score)];
        candidates.extend(tied.into_iter().map(|i| candidate(i, score)));
        return Resolution::Tied { candidates };
    }
    Resolution::Matched(candidate(index, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    #[test]
    fn exact_match_scores_one() {
        assert!((similarity("hierro", "hierro") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_counts_common_characters() {
        // LCS("abcd", "abce") = 3 -> 6 / 8
        assert!((similarity("abcd", "abce") - 0.75).abs() < 1e-9);
        assert!(similarity("abc", "xyz").abs() < 1e-9);
    }

    #[test]
    fn first_declared_wins_ties() {
        let names = ["Abcx", "Abcy"];
        let resolution = best_match("abcz", &keys(&names), &names, 0.7, TieBreak::FirstDeclared);
        let matched = resolution.matched().expect("tie resolves to first");
        assert_eq!(matched.name, "Abcx");
        assert_eq!(matched.index, 0);
    }

    #[test]
    fn reject_policy_reports_ties() {
        let names = ["Abcx", "Abcy"];
        let resolution = best_match("abcz", &keys(&names), &names, 0.7, TieBreak::Reject);
        match resolution {
            Resolution::Tied { candidates } => assert_eq!(candidates.len(), 2),
            other => panic!("expected tie, got {other:?}"),
        }
    }

    #[test]
    fn below_threshold_keeps_closest_for_explanation() {
        let names = ["Calcio", "Zinc"];
        let resolution = best_match("calzone", &keys(&names), &names, 0.8, TieBreak::FirstDeclared);
        match resolution {
            Resolution::BelowThreshold { best: Some(best) } => assert_eq!(best.name, "Calcio"),
            other => panic!("expected below threshold, got {other:?}"),
        }
    }

    #[test]
    fn tie_below_threshold_is_not_a_tie() {
        let names = ["Abcx", "Abcy"];
        let resolution = best_match("abcz", &keys(&names), &names, 0.9, TieBreak::Reject);
        assert!(matches!(resolution, Resolution::BelowThreshold { .. }));
    }
}
