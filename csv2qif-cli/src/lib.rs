//! Shared pieces of the csv2qif binaries

pub mod inputs;
pub mod logging;
