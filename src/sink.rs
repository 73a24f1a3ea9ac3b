//! Logging sinks
//!
//! The reporter only needs "log a string at a severity". [`TracingSink`]
//! forwards to whatever `tracing` subscriber the host installed;
//! [`MemorySink`] keeps entries in memory for tests and embedding.

use std::fmt;
use std::sync::Mutex;

/// Target used for events emitted by [`TracingSink`]
pub const LOG_TARGET: &str = "faultlog";

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl From<Severity> for tracing::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Trace => tracing::Level::TRACE,
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Error => tracing::Level::ERROR,
        }
    }
}

/// Output boundary of the reporter
///
/// Implementations must not block on persistence; hand the entry to a
/// queue or writer and return.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);
}

/// Sink that emits one `tracing` event per entry
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        // `tracing` macros need a constant level
        match severity {
            Severity::Trace => tracing::trace!(target: LOG_TARGET, "{}", message),
            Severity::Debug => tracing::debug!(target: LOG_TARGET, "{}", message),
            Severity::Info => tracing::info!(target: LOG_TARGET, "{}", message),
            Severity::Warning => tracing::warn!(target: LOG_TARGET, "{}", message),
            Severity::Error => tracing::error!(target: LOG_TARGET, "{}", message),
        }
    }
}

/// Sink that records every entry in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries logged so far
    pub fn entries(&self) -> Vec<(Severity, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn log(&self, severity: Severity, message: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.log(Severity::Info, "first");
        sink.log(Severity::Error, "second");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Severity::Info, "first".to_string()));
        assert_eq!(entries[1], (Severity::Error, "second".to_string()));
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: the event is dropped, nothing panics
        TracingSink.log(Severity::Error, "\tError Message: disk full\n");
    }

    #[test]
    fn test_severity_to_level() {
        assert_eq!(tracing::Level::from(Severity::Error), tracing::Level::ERROR);
        assert_eq!(tracing::Level::from(Severity::Warning), tracing::Level::WARN);
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(Severity::Warning.to_string(), "WARN");
    }
}
