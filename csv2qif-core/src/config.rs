//! Conversion configuration document (JSON).
//!
//! ```json
//! {
//!   "formats": [{ "name": "Bank A", "encoding": "utf8", "delimiter": ";",
//!                 "description": ["details", "beneficiary_payer"], "date": "date" }],
//!   "gnucash_aliases": { "bank_a": "Assets:Current Assets:Bank A" },
//!   "mappings": { "Expenses:Groceries": ["rimi", "^maxima"] },
//!   "skip_descriptions": ["Opening balance"],
//!   "skip_currencies": ["USD"]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::format::FormatDescriptor;
use crate::pattern::{MappingTable, Pattern};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub formats: Vec<FormatDescriptor>,
    /// Alias → account label used in the QIF `!Account` header.
    #[serde(default, alias = "gnucash_aliases", alias = "qif_aliases")]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub mappings: MappingTable,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skip_descriptions: Vec<Pattern>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skip_currencies: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        for format in &self.formats {
            if format.delimiter.candidates().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "format {} has no delimiter",
                    format.name
                )));
            }
        }
        Ok(())
    }

    /// First format named `name`; later definitions with the same name are ignored.
    pub fn format(&self, name: &str) -> Result<&FormatDescriptor> {
        self.formats
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownFormat(name.to_string()))
    }

    pub fn account_label(&self, alias: &str) -> Result<&str> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownAlias(alias.to_string()))
    }

    pub fn is_skipped_currency(&self, currency: &str) -> bool {
        self.skip_currencies.iter().any(|c| c == currency)
    }
}
