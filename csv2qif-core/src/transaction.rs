//! Normalized transaction produced by the classifier

use std::cmp::Ordering;

use serde::Serialize;

/// Round to two decimal places, halves away from zero (`0.125` → `0.13`).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One classified bank transaction.
///
/// Exactly one of `increase` / `decrease` is set and both hold non-negative
/// magnitudes. Two transactions with equal fields are duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Date in the source's own format, never reparsed
    pub date: String,
    pub description: String,
    pub account: String,
    pub increase: Option<f64>,
    pub decrease: Option<f64>,
}

impl NormalizedTransaction {
    /// Money in: `amount` is stored as its magnitude.
    pub fn increase(
        date: impl Into<String>,
        description: impl Into<String>,
        account: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            account: account.into(),
            increase: Some(amount.abs()),
            decrease: None,
        }
    }

    /// Money out: `amount` is stored as its magnitude.
    pub fn decrease(
        date: impl Into<String>,
        description: impl Into<String>,
        account: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            account: account.into(),
            increase: None,
            decrease: Some(amount.abs()),
        }
    }

    /// Positive for money in, negative for money out.
    pub fn signed_amount(&self) -> f64 {
        match (self.increase, self.decrease) {
            (Some(inc), _) => inc,
            (None, Some(dec)) => -dec,
            (None, None) => 0.0,
        }
    }

    /// Total order: date and description first (as strings), then the
    /// remaining fields so that equal transactions end up adjacent.
    pub fn ordering(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.account.cmp(&other.account))
            .then_with(|| cmp_amount(self.increase, other.increase))
            .then_with(|| cmp_amount(self.decrease, other.decrease))
    }
}

fn cmp_amount(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}
