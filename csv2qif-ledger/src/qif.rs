//! QIF serialization

use csv2qif_core::NormalizedTransaction;

const RECORD_END: &str = "^";

/// Signed amount text: increases as-is, decreases negated, zero as `0`.
fn amount_text(txn: &NormalizedTransaction) -> String {
    let amount = txn.signed_amount();
    if amount == 0.0 {
        "0".to_string()
    } else {
        format!("{amount}")
    }
}

fn transaction_block(txn: &NormalizedTransaction) -> String {
    format!(
        "!Type:Bank\nD{}\nT{}\nP{}\nL{}\n{RECORD_END}",
        txn.date,
        amount_text(txn),
        txn.description,
        txn.account
    )
}

/// Render an account header followed by one block per dated transaction,
/// in input order. Blocks are newline-separated with no trailing newline.
pub fn render(transactions: &[NormalizedTransaction], account_label: &str) -> String {
    let header = format!("!Account\nN{account_label}\n{RECORD_END}");
    std::iter::once(header)
        .chain(
            transactions
                .iter()
                .filter(|txn| !txn.date.is_empty())
                .map(transaction_block),
        )
        .collect::<Vec<_>>()
        .join("\n")
}
