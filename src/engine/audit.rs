//! Reproducibility helpers: input fingerprint, run id, timestamp.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// blake3 hex digest of the policy text. Stable across runs and platforms.
pub fn hash_text(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Fresh identifier for one engine run.
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let h1 = hash_text("Coverage for power wheelchairs.");
        let h2 = hash_text("Coverage for power wheelchairs.");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_different_for_different_input() {
        let h1 = hash_text("Coverage for power wheelchairs.");
        let h2 = hash_text("Coverage for power wheelchairs!");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_run_ids_unique() {
        assert_ne!(generate_run_id(), generate_run_id());
    }
}
