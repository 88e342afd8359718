//! # Diagnostic Log
//!
//! An append-only, request-scoped trail of timestamped events.
//!
//! Every scan creates its own [`DiagnosticLog`] and threads it by mutable
//! reference through the expander, the neighbor table reader and the
//! coordinator. The finished trail is handed back to the caller so that
//! failures can be diagnosed remotely. Each entry is also mirrored to
//! `tracing` under the `lanmap::diagnostic` target.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.message
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    entries: Vec<LogEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, severity: Severity, message: impl Into<String>) {
        let message: String = message.into();
        match severity {
            Severity::Debug => tracing::debug!(target: "lanmap::diagnostic", "{message}"),
            Severity::Info => tracing::info!(target: "lanmap::diagnostic", "{message}"),
            Severity::Warn => tracing::warn!(target: "lanmap::diagnostic", "{message}"),
            Severity::Error => tracing::error!(target: "lanmap::diagnostic", "{message}"),
        }
        self.entries.push(LogEntry {
            at: Utc::now(),
            severity,
            message,
        });
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(Severity::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every entry as `"[timestamp] message"`, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
