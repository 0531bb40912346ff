//! Conversion pipeline: one blocking parse task per source, then a single
//! finalize pass over the gathered batch.

use std::sync::Arc;

use csv2qif_core::{Config, Diagnostics, Error, FormatDescriptor, NormalizedTransaction, Result};
use csv2qif_ingest::{parse_source, Source};
use tokio::task::JoinSet;

use crate::finalize::finalize;
use crate::qif;

/// A configured conversion into one QIF account.
#[derive(Clone)]
pub struct Conversion {
    config: Arc<Config>,
    format: Arc<FormatDescriptor>,
    account_label: String,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Conversion {
    /// Resolve `format_name` and `account_alias` against `config`.
    pub fn new(
        config: Arc<Config>,
        format_name: &str,
        account_alias: &str,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        let format = Arc::new(config.format(format_name)?.clone());
        let account_label = config.account_label(account_alias)?.to_string();
        Ok(Self {
            config,
            format,
            account_label,
            diagnostics,
        })
    }

    /// Parse every source in parallel and concatenate the results in source
    /// order. The first failing source fails the whole collection.
    pub async fn collect(&self, sources: Vec<Source>) -> Result<Vec<NormalizedTransaction>> {
        let count = sources.len();
        let mut tasks = JoinSet::new();
        for (index, source) in sources.into_iter().enumerate() {
            let config = Arc::clone(&self.config);
            let format = Arc::clone(&self.format);
            let diagnostics = Arc::clone(&self.diagnostics);
            tasks.spawn_blocking(move || {
                let parsed = parse_source(&source, &format, &config, diagnostics.as_ref());
                match &parsed {
                    Ok(txns) => {
                        tracing::debug!(source = %source, transactions = txns.len(), "parsed source")
                    }
                    Err(e) => tracing::error!(source = %source, error = %e, "failed to parse source"),
                }
                (index, parsed)
            });
        }

        let mut per_source: Vec<Vec<NormalizedTransaction>> = (0..count).map(|_| Vec::new()).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, parsed) = joined.map_err(|e| Error::Worker(e.to_string()))?;
            per_source[index] = parsed?;
        }
        Ok(per_source.into_iter().flatten().collect())
    }

    /// Collect and finalize: self-transfers removed, deduplicated, ordered.
    pub async fn transactions(&self, sources: Vec<Source>) -> Result<Vec<NormalizedTransaction>> {
        let batch = self.collect(sources).await?;
        let collected = batch.len();
        let txns = finalize(batch, &self.account_label, self.diagnostics.as_ref());
        tracing::info!(
            format = %self.format.name,
            account = %self.account_label,
            collected,
            kept = txns.len(),
            "finalized batch"
        );
        Ok(txns)
    }

    /// Full conversion to QIF text.
    pub async fn render(&self, sources: Vec<Source>) -> Result<String> {
        let txns = self.transactions(sources).await?;
        Ok(qif::render(&txns, &self.account_label))
    }
}

/// Convert `sources` of format `format_name` into QIF for the account
/// behind `account_alias`.
pub async fn csv2qif(
    sources: Vec<Source>,
    config: Arc<Config>,
    format_name: &str,
    account_alias: &str,
    diagnostics: Arc<dyn Diagnostics>,
) -> Result<String> {
    Conversion::new(config, format_name, account_alias, diagnostics)?
        .render(sources)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv2qif_core::{events, MemoryDiagnostics};

    const CONFIG: &str = r#"{
        "formats": [{"name": "Plain", "delimiter": ";"}],
        "gnucash_aliases": {"bank": "Assets:Bank"},
        "mappings": {"Assets:Bank": ["own transfer"], "Expenses:Groceries": ["rimi"]},
        "skip_currencies": ["USD"]
    }"#;

    const HEADER: &str = "Date;Description;Amount;Currency;Debit/Credit\n";

    fn config() -> Arc<Config> {
        Arc::new(Config::from_json(CONFIG).unwrap())
    }

    fn text(rows: &[&str]) -> Source {
        Source::Text(format!("{HEADER}{}\n", rows.join("\n")))
    }

    fn conversion(diag: Arc<MemoryDiagnostics>) -> Conversion {
        Conversion::new(config(), "Plain", "bank", diag).unwrap()
    }

    #[tokio::test]
    async fn test_single_row_end_to_end() {
        let diag = Arc::new(MemoryDiagnostics::new());
        let source =
            text(&["29.12.2015;American whole magazine truth stop whose ABD;42,02;EUR;D"]);
        let txns = conversion(diag).transactions(vec![source]).await.unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, "29.12.2015");
        assert_eq!(txns[0].signed_amount(), -42.02);
        assert_eq!(txns[0].account, "Imbalance-EUR");
    }

    #[tokio::test]
    async fn test_unmapped_description_is_sanitized() {
        let diag = Arc::new(MemoryDiagnostics::new());
        let source = text(&["29.12.2015;\"'Kiosk   Ltd  '\";42,02;EUR;D"]);
        let txns = conversion(diag).transactions(vec![source]).await.unwrap();
        assert_eq!(txns[0].description, "Kiosk Ltd");
    }

    #[tokio::test]
    async fn test_unknown_format_and_alias() {
        let diag: Arc<dyn Diagnostics> = Arc::new(MemoryDiagnostics::new());
        let err = Conversion::new(config(), "Nope", "bank", Arc::clone(&diag)).err().unwrap();
        assert!(matches!(err, Error::UnknownFormat(_)));
        let err = Conversion::new(config(), "Plain", "nope", diag).err().unwrap();
        assert!(matches!(err, Error::UnknownAlias(_)));
    }

    #[tokio::test]
    async fn test_sources_are_merged_deduplicated_and_ordered() {
        let diag = Arc::new(MemoryDiagnostics::new());
        let first = text(&[
            "02.01.2016;Rimi;-3,10;EUR;D",
            "01.01.2016;Own transfer;100;EUR;D",
        ]);
        let second = text(&["02.01.2016;Rimi;-3,10;EUR;D", "01.01.2016;Kiosk;-1;EUR;D"]);
        let txns = conversion(Arc::clone(&diag))
            .transactions(vec![first, second])
            .await
            .unwrap();

        let descriptions: Vec<&str> = txns.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["Kiosk", "Rimi"]);
        assert_eq!(txns[1].account, "Expenses:Groceries");
        assert_eq!(diag.count(events::SELF_TRANSFER), 1);
        assert_eq!(diag.count(events::DUPLICATES), 1);
    }

    #[tokio::test]
    async fn test_currency_skip_removes_exactly_one() {
        let rows = [
            "01.01.2016;Hotel;-80;USD;D",
            "01.01.2016;Rimi;-3;EUR;D",
            "02.01.2016;Salary;1000;EUR;K",
        ];
        let diag = Arc::new(MemoryDiagnostics::new());
        let with_skip = conversion(Arc::clone(&diag))
            .transactions(vec![text(&rows)])
            .await
            .unwrap();

        let mut no_skip = Config::from_json(CONFIG).unwrap();
        no_skip.skip_currencies.clear();
        let without_skip = Conversion::new(Arc::new(no_skip), "Plain", "bank", diag.clone())
            .unwrap()
            .transactions(vec![text(&rows)])
            .await
            .unwrap();

        assert_eq!(without_skip.len() - with_skip.len(), 1);
        assert!(with_skip.iter().all(|t| t.description != "Hotel"));
    }

    #[tokio::test]
    async fn test_failing_source_fails_the_run() {
        let diag = Arc::new(MemoryDiagnostics::new());
        let good = text(&["01.01.2016;Rimi;-3;EUR;D"]);
        let bad = text(&["01.01.2016;Rimi;three;EUR;D"]);
        let result = conversion(diag).render(vec![good, bad]).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
    }

    #[tokio::test]
    async fn test_render_is_idempotent() {
        let rows = [
            "03.01.2016;\"Kiosk;  Ltd\";-1,20;EUR;D",
            "01.01.2016;Rimi;-3;EUR;D",
            "02.01.2016;Salary;1000;EUR;K",
        ];
        let diag = Arc::new(MemoryDiagnostics::new());
        let conversion = conversion(diag);
        let once = conversion.render(vec![text(&rows)]).await.unwrap();
        let twice = conversion.render(vec![text(&rows)]).await.unwrap();
        assert_eq!(once, twice);
        assert!(once.starts_with("!Account\nNAssets:Bank\n^\n!Type:Bank\nD01.01.2016"));
    }
}
