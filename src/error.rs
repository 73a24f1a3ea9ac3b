//! Error types for faultlog
//!
//! Bootstrap errors (logging pipeline setup) are returned to the caller.
//! Errors raised while reporting a failure are never propagated - they are
//! written to stderr so the original failure keeps its normal path.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for faultlog operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// The log directory could not be created
    #[error("Failed to create log directory {path}: {source}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rolling file appender could not be initialized
    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// A level or filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber was already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),

    /// Building or writing a report panicked
    #[error("Error report panicked: {0}")]
    Panicked(String),
}

impl ReportError {
    /// Build a `Panicked` error from a `catch_unwind` payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        ReportError::Panicked(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::LogDirectory {
            path: PathBuf::from("/nope/Logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/Logs"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_error_from_filter() {
        let parse_err = "=[".parse::<tracing_subscriber::filter::Directive>().unwrap_err();
        let err: ReportError = parse_err.into();
        assert!(matches!(err, ReportError::Filter(_)));
    }

    #[test]
    fn test_from_panic_payloads() {
        let err = ReportError::from_panic(&"static message");
        assert_eq!(
            err.to_string(),
            "Error report panicked: static message"
        );

        let err = ReportError::from_panic(&String::from("owned message"));
        assert!(err.to_string().ends_with("owned message"));

        let err = ReportError::from_panic(&42u32);
        assert!(err.to_string().ends_with("unknown panic payload"));
    }
}
