//! Semantic field resolution against a format descriptor

use csv2qif_core::{Error, FieldSpec, FormatDescriptor, Result, SemanticField};

use crate::record::{header_name, RawRecord};

fn is_separator(c: char) -> bool {
    c == ';' || c == ',' || c.is_whitespace()
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Collapse runs of tab/semicolon/comma/whitespace into one space and strip
/// surrounding quotes and spaces.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if is_separator(c) {
            in_gap = true;
            continue;
        }
        if in_gap && !out.is_empty() {
            out.push(' ');
        }
        in_gap = false;
        out.push(c);
    }
    out.trim_matches(|c: char| is_quote(c) || c == ' ')
        .to_string()
}

fn column<'r>(record: &'r RawRecord, name: &str) -> Option<&'r str> {
    record.get(name).or_else(|| record.get(&header_name(name)))
}

/// Resolve `field` for `record`.
///
/// A composite spec joins the columns that exist (missing ones are skipped);
/// a single-column spec must name an existing column. Without a spec the
/// field's own name is looked up and returned untouched.
pub fn resolve_field(
    record: &RawRecord,
    format: &FormatDescriptor,
    field: SemanticField,
) -> Result<Option<String>> {
    let value = match format.spec(field) {
        Some(FieldSpec::Composite(names)) => {
            let parts: Vec<String> = names
                .iter()
                .filter_map(|name| column(record, name))
                .map(clean_text)
                .collect();
            parts.join(" ")
        }
        Some(FieldSpec::Column(name)) => column(record, name)
            .ok_or_else(|| Error::MissingColumn(name.clone()))?
            .to_string(),
        None => return Ok(record.get(field.column_name()).map(str::to_string)),
    };
    Ok(Some(clean_text(&value)))
}
