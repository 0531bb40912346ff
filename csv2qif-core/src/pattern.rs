//! Description patterns and the account mapping table.
//!
//! A pattern is tried two ways: as a case-insensitive substring and as a
//! case-insensitive regular expression. Patterns that fail to compile as a
//! regex are kept and match by substring only; a malformed pattern never
//! produces an error.

use std::fmt;

use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// Account assigned when no mapping pattern matches a description.
pub const IMBALANCE_ACCOUNT: &str = "Imbalance-EUR";

#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    lowered: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let regex = Regex::new(&format!("(?i){raw}")).ok();
        Self {
            lowered: raw.to_lowercase(),
            raw,
            regex,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern compiled as a regular expression.
    pub fn is_regex(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, description: &str) -> bool {
        if description.to_lowercase().contains(&self.lowered) {
            return true;
        }
        self.regex
            .as_ref()
            .is_some_and(|re| re.is_match(description))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Pattern::new)
    }
}

/// True if any of `patterns` matches `description`.
pub fn matches_any(patterns: &[Pattern], description: &str) -> bool {
    patterns.iter().any(|p| p.matches(description))
}

/// Ordered account → patterns table. Iteration follows the order of the
/// configuration document, which decides ties between accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    entries: Vec<(String, Vec<Pattern>)>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append patterns for `account`, extending an existing entry if present.
    pub fn push<I, S>(&mut self, account: impl Into<String>, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let account = account.into();
        let patterns = patterns.into_iter().map(|p| Pattern::new(p));
        match self.entries.iter_mut().find(|(a, _)| *a == account) {
            Some((_, existing)) => existing.extend(patterns),
            None => self.entries.push((account, patterns.collect())),
        }
    }

    pub fn with<I, S>(mut self, account: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(account, patterns);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Pattern])> {
        self.entries.iter().map(|(a, p)| (a.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First account (in table order) with a pattern matching `description`.
    pub fn find_account(&self, description: &str) -> Option<&str> {
        self.iter()
            .find(|(_, patterns)| matches_any(patterns, description))
            .map(|(account, _)| account)
    }

    /// Like [`find_account`](Self::find_account), falling back to [`IMBALANCE_ACCOUNT`].
    pub fn resolve_account(&self, description: &str) -> &str {
        self.find_account(description).unwrap_or(IMBALANCE_ACCOUNT)
    }
}

impl<'de> Deserialize<'de> for MappingTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = MappingTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of account names to pattern lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<MappingTable, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = MappingTable::new();
                while let Some((account, patterns)) = map.next_entry::<String, PatternList>()? {
                    table.push(account, patterns.0);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Accepts either a list of strings or a single string.
struct PatternList(Vec<String>);

impl<'de> Deserialize<'de> for PatternList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = PatternList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pattern string or a list of pattern strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PatternList, E> {
                Ok(PatternList(vec![v.to_string()]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<PatternList, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = Vec::new();
                while let Some(p) = seq.next_element::<String>()? {
                    out.push(p);
                }
                Ok(PatternList(out))
            }
        }

        deserializer.deserialize_any(ListVisitor)
    }
}
