//! Field records: one input row, mutated only through explicit updates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Returns true when a value carries no visible content.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// An ordered mapping from field name to string value.
///
/// Field order follows the input row. Every mutation bumps `revision`, so
/// callers holding a record can tell whether a later stage changed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: IndexMap<String, String>,
    #[serde(default)]
    revision: u64,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `name`, blank or not.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value stored under `name` when present and non-blank.
    pub fn filled(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !is_blank(v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Insert or overwrite a field. Returns true when the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();
        if self.fields.get(&name) == Some(&value) {
            return false;
        }
        self.fields.insert(name, value);
        self.revision += 1;
        true
    }

    /// Number of mutations applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields: IndexMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            fields,
            revision: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn filled_skips_blank_values() {
        let record: Record = [("a", "1"), ("b", "  ")].into_iter().collect();
        assert_eq!(record.filled("a"), Some("1"));
        assert_eq!(record.filled("b"), None);
        assert_eq!(record.get("b"), Some("  "));
        assert_eq!(record.filled("c"), None);
    }

    #[test]
    fn set_bumps_revision_only_on_change() {
        let mut record = Record::new();
        assert!(record.set("a", "1"));
        assert_eq!(record.revision(), 1);
        assert!(!record.set("a", "1"));
        assert_eq!(record.revision(), 1);
        assert!(record.set("a", "2"));
        assert_eq!(record.revision(), 2);
    }

    #[test]
    fn preserves_input_order() {
        let record: Record = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
