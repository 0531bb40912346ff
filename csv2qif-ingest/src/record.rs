//! Header-keyed rows

use std::sync::Arc;

/// Normalize a header cell into a field name: word-character runs,
/// lower-cased and joined with `_`. Cells without word characters become `x`.
pub fn header_name(cell: &str) -> String {
    let words: Vec<&str> = cell
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return "x".to_string();
    }
    words.join("_").to_lowercase()
}

/// One data row keyed by the normalized header of its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    names: Arc<[String]>,
    values: Vec<String>,
}

impl RawRecord {
    pub(crate) fn new(names: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Build a record from (header cell, value) pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (header_name(k.as_ref()), v.into()))
            .unzip();
        Self::new(names.into(), values)
    }

    /// Value of the first column named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i].as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
