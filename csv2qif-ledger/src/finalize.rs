//! Batch stage: self-transfer filter, deduplication and ordering.
//!
//! Runs once over the complete batch of every input file.

use csv2qif_core::{events, Diagnostics, NormalizedTransaction};

/// Drop transactions booked against `excluded_account`, remove exact
/// duplicates and sort by date then description.
///
/// Ties after date and description are broken by the remaining fields, so
/// identical inputs always produce the same order.
pub fn finalize(
    batch: Vec<NormalizedTransaction>,
    excluded_account: &str,
    diagnostics: &dyn Diagnostics,
) -> Vec<NormalizedTransaction> {
    let (own, mut kept): (Vec<_>, Vec<_>) = batch
        .into_iter()
        .partition(|txn| txn.account == excluded_account);
    for txn in &own {
        diagnostics.warn(
            events::SELF_TRANSFER,
            &[
                ("date", txn.date.clone()),
                ("description", txn.description.clone()),
                ("account", txn.account.clone()),
            ],
        );
    }

    let all = kept.len();
    kept.sort_by(|a, b| a.ordering(b));
    let mut duplicates = Vec::new();
    kept.dedup_by(|later, earlier| {
        let same = later == earlier;
        if same {
            duplicates.push(format!("{} {}", later.date, later.description));
        }
        same
    });

    if !duplicates.is_empty() {
        diagnostics.warn(
            events::DUPLICATES,
            &[
                ("all", all.to_string()),
                ("without_duplicates", kept.len().to_string()),
                ("removed", duplicates.join("; ")),
            ],
        );
    }
    kept
}
