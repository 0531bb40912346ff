//! Per-bank format descriptors: how to read one bank's CSV export.

use serde::Deserialize;

use crate::config::Config;
use crate::error::Result;

/// Debit/credit indicator value that marks money coming in.
pub const DEFAULT_CREDIT_MARKER: &str = "K";

/// The fields a classifier asks a record for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticField {
    Date,
    Description,
    Amount,
    Currency,
    DebitCredit,
}

impl SemanticField {
    /// Column name used when the format does not map the field.
    pub fn column_name(&self) -> &'static str {
        match self {
            SemanticField::Date => "date",
            SemanticField::Description => "description",
            SemanticField::Amount => "amount",
            SemanticField::Currency => "currency",
            SemanticField::DebitCredit => "debit_credit",
        }
    }
}

/// Where a semantic field comes from: one column, or several joined by spaces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Column(String),
    Composite(Vec<String>),
}

/// One delimiter, or candidates tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Delimiters {
    One(String),
    Many(Vec<String>),
}

impl Delimiters {
    /// Candidate delimiter bytes, in configured order. Empty strings are ignored.
    pub fn candidates(&self) -> Vec<u8> {
        let first_byte = |s: &String| s.as_bytes().first().copied();
        match self {
            Delimiters::One(d) => first_byte(d).into_iter().collect(),
            Delimiters::Many(ds) => ds.iter().filter_map(first_byte).collect(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::One(",".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormatDescriptor {
    pub name: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub delimiter: Delimiters,
    #[serde(default)]
    pub description: Option<FieldSpec>,
    #[serde(default)]
    pub date: Option<FieldSpec>,
    #[serde(default)]
    pub amount: Option<FieldSpec>,
    #[serde(default)]
    pub currency: Option<FieldSpec>,
    #[serde(default)]
    pub debit_credit: Option<FieldSpec>,
    #[serde(default = "default_credit_marker")]
    pub credit_marker: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_credit_marker() -> String {
    DEFAULT_CREDIT_MARKER.to_string()
}

impl FormatDescriptor {
    /// A UTF-8 format with a single delimiter and no field mappings.
    pub fn new(name: impl Into<String>, delimiter: char) -> Self {
        Self {
            name: name.into(),
            encoding: default_encoding(),
            delimiter: Delimiters::One(delimiter.to_string()),
            description: None,
            date: None,
            amount: None,
            currency: None,
            debit_credit: None,
            credit_marker: default_credit_marker(),
        }
    }

    pub fn spec(&self, field: SemanticField) -> Option<&FieldSpec> {
        match field {
            SemanticField::Date => self.date.as_ref(),
            SemanticField::Description => self.description.as_ref(),
            SemanticField::Amount => self.amount.as_ref(),
            SemanticField::Currency => self.currency.as_ref(),
            SemanticField::DebitCredit => self.debit_credit.as_ref(),
        }
    }
}

/// Look up `format_name` in a JSON configuration document.
pub fn resolve(config_json: &str, format_name: &str) -> Result<FormatDescriptor> {
    let config = Config::from_json(config_json)?;
    config.format(format_name).cloned()
}
