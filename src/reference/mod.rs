//! HCPCS reference table: code → description, loaded once per process.

mod loader;

pub(crate) use loader::column;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::InferenceResult;
use crate::traits::ReferenceLookup;

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub code: String,
    pub description: String,
}

/// Ordered, read-only HCPCS reference table.
#[derive(Debug, Clone, Default)]
pub struct HcpcsReference {
    version: String,
    entries: Vec<ReferenceEntry>,
    index: HashMap<String, usize>,
}

impl HcpcsReference {
    /// Build from entries. Codes are trimmed; empty codes are skipped and the
    /// first occurrence of a duplicate code wins.
    pub fn from_entries(
        version: impl Into<String>,
        entries: impl IntoIterator<Item = ReferenceEntry>,
    ) -> Self {
        let mut table = Self {
            version: version.into(),
            ..Self::default()
        };

        for (row, entry) in entries.into_iter().enumerate() {
            let code = entry.code.trim().to_string();
            if code.is_empty() {
                warn!(row, "Reference row with empty code, skipped");
                continue;
            }
            if table.index.contains_key(&code) {
                warn!(row, code = %code, "Duplicate reference code, keeping first");
                continue;
            }
            table.index.insert(code.clone(), table.entries.len());
            table.entries.push(ReferenceEntry {
                code,
                description: entry.description.trim().to_string(),
            });
        }

        table
    }

    /// Load a `code,description` CSV.
    pub fn load_csv(path: impl AsRef<Path>, version: impl Into<String>) -> InferenceResult<Self> {
        let entries = loader::read_reference_csv(path.as_ref())?;
        Ok(Self::from_entries(version, entries))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceLookup for HcpcsReference {
    fn lookup(&self, code: &str) -> Option<&str> {
        self.index
            .get(code)
            .map(|&i| self.entries[i].description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, description: &str) -> ReferenceEntry {
        ReferenceEntry {
            code: code.into(),
            description: description.into(),
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let table = HcpcsReference::from_entries(
            "2024_Q1",
            vec![entry("E0100", "Cane"), entry(" E0105 ", "Quad cane")],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("E0105"), Some("Quad cane"));
        assert_eq!(table.lookup("E9999"), None);
        assert_eq!(table.entries()[0].code, "E0100");
    }

    #[test]
    fn test_duplicates_and_blanks_skipped() {
        let table = HcpcsReference::from_entries(
            "v",
            vec![entry("E0100", "first"), entry("", "blank"), entry("E0100", "second")],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("E0100"), Some("first"));
    }
}
