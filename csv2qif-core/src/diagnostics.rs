//! Diagnostics sink passed through the conversion pipeline.
//!
//! Drops, self-transfers and duplicate collisions are not errors; they are
//! reported here with structured key/value fields.

use std::sync::Mutex;

pub type Field<'a> = (&'a str, String);

pub trait Diagnostics: Send + Sync {
    fn warn(&self, event: &str, fields: &[Field<'_>]);
    fn error(&self, event: &str, fields: &[Field<'_>]);
}

fn join_fields(fields: &[Field<'_>]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={v:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, event: &str, fields: &[Field<'_>]) {
        tracing::warn!(event = event, "{}", join_fields(fields));
    }

    fn error(&self, event: &str, fields: &[Field<'_>]) {
        tracing::error!(event = event, "{}", join_fields(fields));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub event: String,
    pub fields: Vec<(String, String)>,
}

impl Diagnostic {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, event: &str, fields: &[Field<'_>]) {
        let diagnostic = Diagnostic {
            level,
            event: event.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        // A poisoned lock still holds valid entries.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(diagnostic);
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.entries().iter().filter(|d| d.event == event).count()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn warn(&self, event: &str, fields: &[Field<'_>]) {
        self.push(Level::Warn, event, fields);
    }

    fn error(&self, event: &str, fields: &[Field<'_>]) {
        self.push(Level::Error, event, fields);
    }
}
