//! In-memory path lookup table.

use std::collections::HashMap;

use crate::source::record::PathRecord;

/// Immutable `path -> url` table built once from a list of records.
///
/// Later records overwrite earlier ones with the same path.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, String>,
}

impl MappingTable {
    /// Build a table from records, last write wins on duplicate paths.
    pub fn build(records: impl IntoIterator<Item = PathRecord>) -> Self {
        records.into_iter().collect()
    }

    /// Exact-match lookup.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PathRecord> for MappingTable {
    fn from_iter<I: IntoIterator<Item = PathRecord>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for record in iter {
            entries.insert(record.path, record.url);
        }
        Self { entries }
    }
}
