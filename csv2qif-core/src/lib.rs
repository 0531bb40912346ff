//! csv2qif-core: configuration, patterns and transaction types for csv2qif

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod pattern;
pub mod transaction;

pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use format::{Delimiters, FieldSpec, FormatDescriptor, SemanticField};
pub use pattern::{MappingTable, Pattern, IMBALANCE_ACCOUNT};
pub use transaction::{round_cents, NormalizedTransaction};

/// Diagnostic event names reported by the pipeline.
pub mod events {
    pub const SKIP_DESCRIPTION: &str = "skip_description";
    pub const SKIP_CURRENCY: &str = "skip_currency";
    pub const SELF_TRANSFER: &str = "self_transfer";
    pub const DUPLICATES: &str = "duplicates";
}
