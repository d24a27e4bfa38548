//! Open-ended, producer-specific metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Producer metadata keyed by name. Ordered so serialized output is stable.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<u64> for MetadataValue {
    fn from(v: u64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<usize> for MetadataValue {
    fn from(v: usize) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_serialization_is_plain_json() {
        let mut meta = Metadata::new();
        meta.insert("api_provider".into(), "groq".into());
        meta.insert("num_matches".into(), 4usize.into());
        meta.insert("matching_keywords".into(), vec!["wheelchair".to_string()].into());
        meta.insert("cached".into(), false.into());

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["api_provider"], "groq");
        assert_eq!(json["num_matches"], 4.0);
        assert_eq!(json["matching_keywords"][0], "wheelchair");
        assert_eq!(json["cached"], false);

        let back: Metadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }
}
