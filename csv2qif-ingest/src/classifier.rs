//! Turns a raw record into a normalized transaction, or drops it.

use csv2qif_core::{
    events, round_cents, Config, Diagnostics, Error, FormatDescriptor, NormalizedTransaction,
    Result, SemanticField,
};

use crate::amount::parse_amount;
use crate::fields::{clean_text, resolve_field};
use crate::record::RawRecord;

/// Currency converted to EUR on import.
pub const LEGACY_CURRENCY: &str = "EEK";
/// Fixed EEK per EUR rate.
pub const LEGACY_RATE: f64 = 15.6466;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    SkipDescription { pattern: String },
    SkipCurrency { currency: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Kept(NormalizedTransaction),
    Dropped(DropReason),
}

impl Classification {
    pub fn into_kept(self) -> Option<NormalizedTransaction> {
        match self {
            Classification::Kept(txn) => Some(txn),
            Classification::Dropped(_) => None,
        }
    }
}

pub struct Classifier<'a> {
    format: &'a FormatDescriptor,
    config: &'a Config,
}

impl<'a> Classifier<'a> {
    pub fn new(format: &'a FormatDescriptor, config: &'a Config) -> Self {
        Self { format, config }
    }

    fn field(&self, record: &RawRecord, field: SemanticField) -> Result<Option<String>> {
        resolve_field(record, self.format, field)
    }

    /// Classify one record.
    ///
    /// Skip rules are checked in order (description, then currency) and the
    /// first that applies drops the record. A malformed amount is an error,
    /// never a drop.
    pub fn classify(
        &self,
        record: &RawRecord,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Classification> {
        let mut description = self
            .field(record, SemanticField::Description)?
            .map(|d| clean_text(&d))
            .unwrap_or_default();
        let indicator = self.field(record, SemanticField::DebitCredit)?;
        let date = self.field(record, SemanticField::Date)?.unwrap_or_default();

        if let Some(pattern) = self
            .config
            .skip_descriptions
            .iter()
            .find(|p| p.matches(&description))
        {
            diagnostics.warn(
                events::SKIP_DESCRIPTION,
                &[
                    ("date", date.clone()),
                    ("description", description.clone()),
                    ("pattern", pattern.as_str().to_string()),
                ],
            );
            return Ok(Classification::Dropped(DropReason::SkipDescription {
                pattern: pattern.as_str().to_string(),
            }));
        }

        let raw_amount = self
            .field(record, SemanticField::Amount)?
            .ok_or_else(|| Error::MissingColumn(SemanticField::Amount.column_name().to_string()))?;
        let mut amount = parse_amount(&raw_amount)?;

        let currency = self
            .field(record, SemanticField::Currency)?
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if self.config.is_skipped_currency(&currency) {
            diagnostics.warn(
                events::SKIP_CURRENCY,
                &[
                    ("date", date),
                    ("description", description),
                    ("currency", currency.clone()),
                ],
            );
            return Ok(Classification::Dropped(DropReason::SkipCurrency { currency }));
        }

        if currency == LEGACY_CURRENCY {
            let converted = round_cents(amount / LEGACY_RATE);
            let note = format!("{amount} {LEGACY_CURRENCY} -> {converted} EUR");
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&note);
            amount = converted;
        }

        let account = self.config.mappings.resolve_account(&description);
        let indicator = indicator.as_deref().map(str::trim).filter(|i| !i.is_empty());
        let money_in = match indicator {
            Some(value) => value == self.format.credit_marker,
            None => amount > 0.0,
        };
        let txn = if money_in {
            NormalizedTransaction::increase(date, description, account, amount)
        } else {
            NormalizedTransaction::decrease(date, description, account, amount)
        };
        Ok(Classification::Kept(txn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv2qif_core::{MappingTable, MemoryDiagnostics, Pattern, IMBALANCE_ACCOUNT};

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::from_pairs(pairs.iter().copied())
    }

    fn row(description: &str, amount: &str, currency: &str, indicator: &str) -> RawRecord {
        record(&[
            ("Date", "29.12.2015"),
            ("Description", description),
            ("Amount", amount),
            ("Currency", currency),
            ("Debit/Credit", indicator),
        ])
    }

    fn config() -> Config {
        Config {
            mappings: MappingTable::new()
                .with("Expenses:Groceries", ["rimi", "^maxima"])
                .with("Expenses:Food", ["rimi hyper"]),
            skip_descriptions: vec![Pattern::new("Opening balance")],
            skip_currencies: vec!["USD".to_string()],
            ..Config::default()
        }
    }

    fn classify(record: &RawRecord, config: &Config, diag: &MemoryDiagnostics) -> Classification {
        let format = FormatDescriptor::new("Bank", ';');
        Classifier::new(&format, config).classify(record, diag).unwrap()
    }

    fn kept(record: &RawRecord) -> NormalizedTransaction {
        classify(record, &config(), &MemoryDiagnostics::new())
            .into_kept()
            .expect("record should be kept")
    }

    #[test]
    fn test_debit_goes_to_decrease() {
        let txn = kept(&row("American whole magazine truth stop whose ABD", "42,02", "EUR", "D"));
        assert_eq!(txn.date, "29.12.2015");
        assert_eq!(txn.decrease, Some(42.02));
        assert_eq!(txn.increase, None);
        assert_eq!(txn.account, IMBALANCE_ACCOUNT);
    }

    #[test]
    fn test_unmapped_description_is_cleaned() {
        let txn = kept(&row("'Kiosk   Ltd  '", "42,02", "EUR", "D"));
        assert_eq!(txn.description, "Kiosk Ltd");
        let txn = kept(&row("\"Misc;\t note\"", "1", "EUR", "D"));
        assert_eq!(txn.description, "Misc note");
    }

    #[test]
    fn test_credit_marker_goes_to_increase() {
        let txn = kept(&row("Salary", "-1500,00", "EUR", "K"));
        assert_eq!(txn.increase, Some(1500.0));
        assert_eq!(txn.decrease, None);
    }

    #[test]
    fn test_sign_without_indicator() {
        let txn = kept(&row("Refund", "12,50", "EUR", ""));
        assert_eq!(txn.increase, Some(12.5));
        let txn = kept(&row("Shop", "-12,50", "EUR", " "));
        assert_eq!(txn.decrease, Some(12.5));
        let txn = kept(&row("Nothing", "0", "EUR", ""));
        assert_eq!(txn.decrease, Some(0.0));
    }

    #[test]
    fn test_first_account_in_table_order_wins() {
        let txn = kept(&row("RIMI HYPER Riga", "-3,10", "EUR", "D"));
        assert_eq!(txn.account, "Expenses:Groceries");
        let txn = kept(&row("Maxima XX", "-3,10", "EUR", "D"));
        assert_eq!(txn.account, "Expenses:Groceries");
    }

    #[test]
    fn test_skip_description_is_reported() {
        let diag = MemoryDiagnostics::new();
        let result = classify(&row("OPENING BALANCE", "x", "EUR", ""), &config(), &diag);
        assert_eq!(
            result,
            Classification::Dropped(DropReason::SkipDescription {
                pattern: "Opening balance".to_string()
            })
        );
        let entries = diag.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, events::SKIP_DESCRIPTION);
        assert_eq!(entries[0].field("pattern"), Some("Opening balance"));
    }

    #[test]
    fn test_skip_currency_after_amount_parse() {
        let diag = MemoryDiagnostics::new();
        let result = classify(&row("Hotel", "-80,00", "USD", "D"), &config(), &diag);
        assert!(matches!(
            result,
            Classification::Dropped(DropReason::SkipCurrency { ref currency }) if currency == "USD"
        ));
        assert_eq!(diag.count(events::SKIP_CURRENCY), 1);

        let format = FormatDescriptor::new("Bank", ';');
        let err = Classifier::new(&format, &config())
            .classify(&row("Hotel", "eighty", "USD", "D"), &diag)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));
    }

    #[test]
    fn test_legacy_currency_is_converted() {
        let txn = kept(&row("Old deposit", "100", "EEK", "K"));
        assert_eq!(txn.increase, Some(round_cents(100.0 / LEGACY_RATE)));
        assert!(txn.description.contains("100 EEK ->"));
        assert_eq!(txn.description, "Old deposit 100 EEK -> 6.39 EUR");
    }

    #[test]
    fn test_legacy_note_can_select_account() {
        let mut config = config();
        config.mappings.push("Equity:Legacy", ["EEK ->"]);
        let diag = MemoryDiagnostics::new();
        let txn = classify(&row("Old deposit", "100", "EEK", "K"), &config, &diag)
            .into_kept()
            .unwrap();
        assert_eq!(txn.account, "Equity:Legacy");
    }

    #[test]
    fn test_missing_amount_column() {
        let format = FormatDescriptor::new("Bank", ';');
        let config = Config::default();
        let err = Classifier::new(&format, &config)
            .classify(&record(&[("Date", "1"), ("Description", "x")]), &MemoryDiagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "amount"));
    }
}
