//! Input sources and text decoding

use std::fmt;
use std::fs;
use std::path::PathBuf;

use csv2qif_core::{Error, FormatDescriptor, Result};
use encoding_rs::Encoding;

/// A bank export: a file on disk or its text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Text(String),
}

impl Source {
    /// Read and decode the source with the format's encoding.
    pub fn read(&self, format: &FormatDescriptor) -> Result<String> {
        match self {
            Source::Text(text) => Ok(text.clone()),
            Source::Path(path) => {
                let bytes = fs::read(path)?;
                decode(&bytes, format)
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Text(_) => f.write_str("<text>"),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

fn lookup_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes())
        .or_else(|| Encoding::for_label(label.replace('_', "-").as_bytes()))
}

/// Decode bytes with the format's encoding. Malformed sequences become
/// U+FFFD; a leading byte-order mark is removed.
pub fn decode(bytes: &[u8], format: &FormatDescriptor) -> Result<String> {
    let encoding = lookup_encoding(&format.encoding).ok_or_else(|| Error::UnknownEncoding {
        format: format.name.clone(),
        encoding: format.encoding.clone(),
    })?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(format = %format.name, encoding = encoding.name(), "replaced undecodable bytes");
    }
    Ok(text.into_owned())
}
