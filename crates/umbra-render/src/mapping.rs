//! Explicit original → replacement color overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from an original color key to its replacement color expression.
///
/// Keys are case-folded on the way in, so `#FFFFFF` and `#ffffff` address the
/// same entry. Entries are only added or overwritten, never pruned. Iteration
/// is ordered by key, which keeps generated stylesheets deterministic.
///
/// Serializes as a plain JSON/YAML object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ColorMappings {
    entries: BTreeMap<String, String>,
}

impl ColorMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge-writes one entry, returning the replacement it overwrote.
    pub fn insert(
        &mut self,
        original: impl AsRef<str>,
        replacement: impl Into<String>,
    ) -> Option<String> {
        self.entries
            .insert(fold_key(original.as_ref()), replacement.into())
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(&fold_key(original)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn fold_key(original: &str) -> String {
    original.trim().to_lowercase()
}

impl From<BTreeMap<String, String>> for ColorMappings {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ColorMappings> for BTreeMap<String, String> {
    fn from(mappings: ColorMappings) -> Self {
        mappings.entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ColorMappings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mappings = ColorMappings::new();
        mappings.extend(iter);
        mappings
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for ColorMappings {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (original, replacement) in iter {
            self.insert(original, replacement);
        }
    }
}
