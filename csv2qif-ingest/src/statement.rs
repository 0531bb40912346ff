//! One bank statement: source → normalized transactions.

use csv2qif_core::{Config, Diagnostics, FormatDescriptor, NormalizedTransaction, Result};

use crate::classifier::{Classification, Classifier};
use crate::source::Source;
use crate::tokenizer::{detect_delimiter, tokenize};

fn delimiter_for(text: &str, format: &FormatDescriptor) -> u8 {
    match format.delimiter.candidates().as_slice() {
        [only] => *only,
        candidates => detect_delimiter(text, candidates),
    }
}

/// Classify every record of already decoded text.
pub fn parse_text(
    text: &str,
    format: &FormatDescriptor,
    config: &Config,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<NormalizedTransaction>> {
    let classifier = Classifier::new(format, config);
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for record in tokenize(text, delimiter_for(text, format)) {
        match classifier.classify(&record?, diagnostics)? {
            Classification::Kept(txn) => kept.push(txn),
            Classification::Dropped(_) => dropped += 1,
        }
    }
    tracing::debug!(format = %format.name, kept = kept.len(), dropped, "classified records");
    Ok(kept)
}

/// Read, decode and classify one source.
pub fn parse_source(
    source: &Source,
    format: &FormatDescriptor,
    config: &Config,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<NormalizedTransaction>> {
    let text = source.read(format)?;
    tracing::debug!(source = %source, bytes = text.len(), "read source");
    parse_text(&text, format, config, diagnostics)
}
