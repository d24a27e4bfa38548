//! Property-based tests for aggregation guarantees.
//!
//! For any evidence collection:
//! 1. At most one final code per distinct code
//! 2. Each final confidence equals its group's maximum and clears the threshold
//! 3. Every group whose maximum clears the threshold is present
//! 4. Output is ranked (confidence descending, code ascending)
//! 5. Aggregation is deterministic and independent of unrelated input order

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use hcpcs_inference::aggregation::Aggregator;
use hcpcs_inference::engine::hash_text;
use hcpcs_inference::traits::EmptyReference;
use hcpcs_inference::types::{Evidence, ModelInfo};

// =============================================================================
// Strategy helpers
// =============================================================================

fn evidence_strategy() -> impl Strategy<Value = Evidence> {
    (
        prop::sample::select(vec!["A1111", "B2222", "C3333", "E0100", "K0823"]),
        prop::sample::select(vec!["p1", "p2", "p3"]),
        0.0f64..=1.0,
    )
        .prop_map(|(code, producer, confidence)| {
            Evidence::new(
                code,
                producer,
                "1.0",
                format!("{producer}:{code}:{confidence}"),
                confidence,
                ModelInfo::Local {
                    name: "prop".into(),
                    version: "1".into(),
                },
            )
        })
}

fn group_max(evidence: &[Evidence]) -> HashMap<&str, f64> {
    let mut max: HashMap<&str, f64> = HashMap::new();
    for e in evidence {
        let slot = max.entry(e.code.as_str()).or_insert(f64::MIN);
        if e.normalized_confidence > *slot {
            *slot = e.normalized_confidence;
        }
    }
    max
}

proptest! {
    #[test]
    fn one_final_code_per_distinct_code(
        evidence in prop::collection::vec(evidence_strategy(), 0..40),
        threshold in 0.0f64..=1.0,
    ) {
        let codes = Aggregator::new(threshold, "v").aggregate(&evidence, &EmptyReference);
        let distinct: HashSet<_> = codes.iter().map(|c| c.code.as_str()).collect();
        prop_assert_eq!(distinct.len(), codes.len());
    }

    #[test]
    fn confidence_is_group_max_and_clears_threshold(
        evidence in prop::collection::vec(evidence_strategy(), 0..40),
        threshold in 0.0f64..=1.0,
    ) {
        let codes = Aggregator::new(threshold, "v").aggregate(&evidence, &EmptyReference);
        let max = group_max(&evidence);

        for code in &codes {
            prop_assert!(code.aggregated_confidence >= threshold);
            prop_assert_eq!(code.aggregated_confidence, max[code.code.as_str()]);
        }

        let expected = max.values().filter(|&&m| m >= threshold).count();
        prop_assert_eq!(codes.len(), expected);
    }

    #[test]
    fn output_is_ranked(
        evidence in prop::collection::vec(evidence_strategy(), 0..40),
    ) {
        let codes = Aggregator::new(0.3, "v").aggregate(&evidence, &EmptyReference);
        for pair in codes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.aggregated_confidence > b.aggregated_confidence
                    || (a.aggregated_confidence == b.aggregated_confidence && a.code < b.code)
            );
        }
    }

    #[test]
    fn aggregation_is_deterministic(
        evidence in prop::collection::vec(evidence_strategy(), 0..40),
    ) {
        let aggregator = Aggregator::new(0.5, "v");
        let first = aggregator.aggregate(&evidence, &EmptyReference);
        let second = aggregator.aggregate(&evidence, &EmptyReference);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn code_set_independent_of_input_order(
        evidence in prop::collection::vec(evidence_strategy(), 0..40),
    ) {
        let aggregator = Aggregator::new(0.5, "v");
        let forward = aggregator.aggregate(&evidence, &EmptyReference);
        let mut reversed_input = evidence.clone();
        reversed_input.reverse();
        let reversed = aggregator.aggregate(&reversed_input, &EmptyReference);

        let a: Vec<_> = forward.iter().map(|c| (c.code.clone(), c.aggregated_confidence)).collect();
        let b: Vec<_> = reversed.iter().map(|c| (c.code.clone(), c.aggregated_confidence)).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn input_hash_tracks_text(a in ".{0,200}", b in ".{0,200}") {
        prop_assert_eq!(hash_text(&a), hash_text(&a));
        if a != b {
            prop_assert_ne!(hash_text(&a), hash_text(&b));
        }
    }
}
