//! csv2qif-ledger: batch finalization, QIF output and the conversion pipeline

pub mod conflicts;
pub mod finalize;
pub mod pipeline;
pub mod qif;

pub use conflicts::{find_conflicts, Conflict};
pub use finalize::finalize;
pub use pipeline::{csv2qif, Conversion};
pub use qif::render;
