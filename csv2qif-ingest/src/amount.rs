//! Amount cell parsing.
//!
//! Bank exports mix decimal commas, decimal points and grouping separators
//! (`42,02`, `-1.234,56`, `2 500,00`, `1,234.56`). Whitespace is removed
//! first. With both `,` and `.` present the right-most one is the decimal
//! separator; a lone separator repeated more than once is grouping.

use csv2qif_core::{round_cents, Error, Result};

fn invalid(raw: &str) -> Error {
    Error::InvalidAmount {
        value: raw.to_string(),
    }
}

fn normalize(compact: &str) -> String {
    let comma = compact.rfind(',');
    let dot = compact.rfind('.');
    match (comma, dot) {
        (Some(c), Some(d)) => {
            let (decimal, grouping) = if c > d { (',', '.') } else { ('.', ',') };
            compact
                .chars()
                .filter(|&ch| ch != grouping)
                .map(|ch| if ch == decimal { '.' } else { ch })
                .collect()
        }
        (Some(_), None) if compact.matches(',').count() > 1 => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        (None, Some(_)) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        _ => compact.to_string(),
    }
}

/// Parse an amount cell and round it to cents.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(invalid(raw));
    }
    let value: f64 = normalize(&compact).parse().map_err(|_| invalid(raw))?;
    if !value.is_finite() {
        return Err(invalid(raw));
    }
    Ok(round_cents(value))
}
