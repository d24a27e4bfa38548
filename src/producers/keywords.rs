//! Keyword extraction and a per-code keyword index over the reference table.

use std::collections::{BTreeSet, HashSet};

use crate::reference::HcpcsReference;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "should", "could", "may", "might", "must", "can", "shall", "this",
    "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "what", "which",
    "who", "when", "where", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "than", "too", "very", "just", "only",
    // too common in policy and HCPCS text to discriminate
    "procedure", "service", "treatment", "patient", "medical",
];

const STRIP_CHARS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '-', '/',
];

/// Lowercased, punctuation-stripped, stop-word-filtered keyword sets.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<&'static str>,
    min_len: usize,
}

impl KeywordExtractor {
    pub fn new(min_len: usize) -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            min_len,
        }
    }

    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|word| word.trim_matches(STRIP_CHARS))
            .filter(|clean| {
                clean.chars().count() >= self.min_len
                    && !self.stop_words.contains(*clean)
                    && !clean.chars().all(|c| c.is_ascii_digit())
            })
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(3)
    }
}

/// A reference code with its description's keywords precomputed.
#[derive(Debug, Clone)]
pub struct IndexedCode {
    pub code: String,
    pub description: String,
    pub keywords: BTreeSet<String>,
}

impl IndexedCode {
    /// Keywords shared with the policy, sorted.
    pub fn overlap(&self, policy_keywords: &BTreeSet<String>) -> Vec<String> {
        self.keywords
            .intersection(policy_keywords)
            .cloned()
            .collect()
    }
}

/// Keyword index over every reference entry, in reference order.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    entries: Vec<IndexedCode>,
}

impl KeywordIndex {
    pub fn build(reference: &HcpcsReference, extractor: &KeywordExtractor) -> Self {
        let entries = reference
            .entries()
            .iter()
            .map(|e| IndexedCode {
                code: e.code.clone(),
                description: e.description.clone(),
                keywords: extractor.extract(&e.description),
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedCode> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filters_noise() {
        let kw = KeywordExtractor::default().extract(
            "The patient (age 67) requires a Power Wheelchair, 2024 model; see policy-123.",
        );
        assert!(kw.contains("power"));
        assert!(kw.contains("wheelchair"));
        assert!(kw.contains("requires"));
        assert!(kw.contains("policy-123"));
        assert!(!kw.contains("the"));
        assert!(!kw.contains("patient"));
        assert!(!kw.contains("2024"));
        assert!(!kw.contains("67)"));
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert!(KeywordExtractor::default().extract("  \n\t ").is_empty());
    }
}
