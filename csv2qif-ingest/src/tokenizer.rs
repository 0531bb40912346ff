//! Delimited-text tokenizer: turns a CSV export into header-keyed records.
//!
//! The first non-blank row is the header. Some banks export a single quoted
//! column holding a tab-separated payload; such rows are re-split on tabs.

use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use csv2qif_core::{Error, Result};

use crate::record::{header_name, RawRecord};

/// A lone field with more tabs than this is treated as a tab-separated row.
const EMBEDDED_TAB_THRESHOLD: usize = 4;

fn split_embedded_tabs(record: &StringRecord) -> Vec<String> {
    if record.len() == 1 {
        let only = &record[0];
        if only.matches('\t').count() > EMBEDDED_TAB_THRESHOLD {
            return only.split('\t').map(str::to_string).collect();
        }
    }
    record.iter().map(str::to_string).collect()
}

/// Single-pass iterator over the records of one source.
pub struct RowTokenizer<'a> {
    reader: csv::Reader<&'a [u8]>,
    header: Option<Arc<[String]>>,
    buf: StringRecord,
}

impl<'a> RowTokenizer<'a> {
    pub fn new(text: &'a str, delimiter: u8) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());
        Self {
            reader,
            header: None,
            buf: StringRecord::new(),
        }
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.reader.read_record(&mut self.buf)? {
            Ok(Some(split_embedded_tabs(&self.buf)))
        } else {
            Ok(None)
        }
    }

    /// Normalized header names, reading the header row if needed.
    /// `None` for a source without any rows.
    pub fn header(&mut self) -> Result<Option<&[String]>> {
        if self.header.is_none() {
            if let Some(row) = self.next_row()? {
                let names: Vec<String> = row.iter().map(|cell| header_name(cell)).collect();
                self.header = Some(names.into());
            }
        }
        Ok(self.header.as_deref())
    }

    fn line(&self) -> u64 {
        self.buf.position().map(|p| p.line()).unwrap_or(0)
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        if self.header()?.is_none() {
            return Ok(None);
        }
        let Some(names) = self.header.clone() else {
            return Ok(None);
        };
        let Some(values) = self.next_row()? else {
            return Ok(None);
        };
        if values.len() != names.len() {
            return Err(Error::MalformedRow {
                line: self.line(),
                expected: names.len(),
                found: values.len(),
            });
        }
        Ok(Some(RawRecord::new(names, values)))
    }
}

impl Iterator for RowTokenizer<'_> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

pub fn tokenize(text: &str, delimiter: u8) -> RowTokenizer<'_> {
    RowTokenizer::new(text, delimiter)
}

/// Pick the first candidate whose header row splits into more than one
/// column, falling back to tab.
pub fn detect_delimiter(text: &str, candidates: &[u8]) -> u8 {
    for &delimiter in candidates {
        let mut tokenizer = RowTokenizer::new(text, delimiter);
        if let Ok(Some(header)) = tokenizer.header() {
            if header.len() > 1 {
                return delimiter;
            }
        }
    }
    b'\t'
}
