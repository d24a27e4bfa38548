//! Candidate shortlist sent to the remote model.

use std::collections::BTreeSet;

use super::super::keywords::KeywordIndex;

/// A reference code worth asking the model about.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub code: String,
    pub description: String,
    /// Fraction of the description's keywords present in the policy.
    pub score: f64,
}

/// Rank reference codes by description similarity, keep those scoring at
/// least `min_score`, best first (ties by code), at most `top_k`.
pub fn rank_candidates(
    index: &KeywordIndex,
    policy_keywords: &BTreeSet<String>,
    min_score: f64,
    top_k: usize,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = index
        .iter()
        .filter(|entry| !entry.keywords.is_empty())
        .filter_map(|entry| {
            let shared = entry.keywords.intersection(policy_keywords).count();
            let score = shared as f64 / entry.keywords.len() as f64;
            (shared > 0 && score >= min_score).then(|| Candidate {
                code: entry.code.clone(),
                description: entry.description.clone(),
                score,
            })
        })
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.code.cmp(&b.code)));
    candidates.truncate(top_k);
    candidates
}
