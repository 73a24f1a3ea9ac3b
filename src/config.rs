//! Configuration management for faultlog
//!
//! Handles loading environment variables with fail-soft behavior.
//! Invalid values produce a warning on stderr and fall back to the default;
//! configuration problems never stop the host application.

use std::path::PathBuf;
use std::sync::Arc;

/// Reporter configuration
///
/// Loaded from environment variables:
/// - `FAULTLOG_INCLUDE_HEADERS`: dump request headers into reports (defaults to on in
///   debug builds and off in release builds)
/// - `FAULTLOG_REDACT_HEADERS`: mask credential-bearing headers when dumping (default off)
/// - `FAULTLOG_TRUST_PROXY`: take the client IP and URL from `X-Real-IP` / `X-Forwarded-*`
/// - `FAULTLOG_REPORT_CLIENT_ERRORS`: also report 4xx errors
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether request headers are written into each report
    pub include_headers: bool,

    /// Whether sensitive header values are masked when headers are included
    pub redact_sensitive_headers: bool,

    /// Whether proxy headers are trusted for the client address and URL
    pub trust_proxy_headers: bool,

    /// Whether client errors (4xx) are reported in addition to server errors
    pub report_client_errors: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default_for_build();
        let config = Self {
            include_headers: env_flag("FAULTLOG_INCLUDE_HEADERS")
                .unwrap_or(defaults.include_headers),
            redact_sensitive_headers: env_flag("FAULTLOG_REDACT_HEADERS")
                .unwrap_or(defaults.redact_sensitive_headers),
            trust_proxy_headers: env_flag("FAULTLOG_TRUST_PROXY")
                .unwrap_or(defaults.trust_proxy_headers),
            report_client_errors: env_flag("FAULTLOG_REPORT_CLIENT_ERRORS")
                .unwrap_or(defaults.report_client_errors),
        };

        if config.include_headers && !cfg!(debug_assertions) {
            eprintln!("[faultlog] Request headers will be written to error logs in a release build");
        }

        config
    }

    /// Defaults for the current build profile, ignoring the environment
    ///
    /// Header dumping follows `debug_assertions` so release builds never
    /// write request headers unless explicitly asked to.
    pub fn default_for_build() -> Self {
        Self {
            include_headers: cfg!(debug_assertions),
            redact_sensitive_headers: false,
            trust_proxy_headers: false,
            report_client_errors: false,
        }
    }

    /// Create configuration with an explicit header flag (useful for testing)
    pub fn new(include_headers: bool) -> Self {
        Self {
            include_headers,
            ..Self::default_for_build()
        }
    }

    /// Wrap config in Arc for thread-safe sharing
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Logging pipeline configuration used by [`crate::logging::init`]
///
/// Loaded from environment variables:
/// - `FAULTLOG_LEVEL`: default filter when `RUST_LOG` is unset (default `info`)
/// - `FAULTLOG_LOG_DIR`: directory for daily-rolling log files (console only when unset)
/// - `FAULTLOG_LOG_PREFIX`: log file name prefix (default `Logs`)
/// - `FAULTLOG_QUIET_FRAMEWORK`: only let actix framework errors through
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub quiet_framework: bool,
    pub ansi: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: non_empty_var("FAULTLOG_LEVEL").unwrap_or(defaults.level),
            log_dir: non_empty_var("FAULTLOG_LOG_DIR").map(PathBuf::from),
            file_prefix: non_empty_var("FAULTLOG_LOG_PREFIX").unwrap_or(defaults.file_prefix),
            quiet_framework: env_flag("FAULTLOG_QUIET_FRAMEWORK")
                .unwrap_or(defaults.quiet_framework),
            ansi: defaults.ansi,
        }
    }

    /// Enable the rolling file provider under `dir`
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "Logs".to_string(),
            quiet_framework: false,
            ansi: true,
        }
    }
}

/// Parse a boolean flag, warning on unrecognized values
fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        eprintln!("[faultlog] Ignoring {}={:?}: expected true/false", name, raw);
    }
    parsed
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = Config::new(true);
        assert!(config.include_headers);
        assert!(!config.redact_sensitive_headers);
        assert!(!config.trust_proxy_headers);
        assert!(!config.report_client_errors);

        let config = Config::new(false);
        assert!(!config.include_headers);
    }

    #[test]
    fn test_default_follows_build_profile() {
        let config = Config::default_for_build();
        assert_eq!(config.include_headers, cfg!(debug_assertions));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_report_client_errors_from_env() {
        std::env::set_var("FAULTLOG_REPORT_CLIENT_ERRORS", "true");
        let config = Config::from_env();
        assert!(config.report_client_errors);
        std::env::remove_var("FAULTLOG_REPORT_CLIENT_ERRORS");
    }

    #[test]
    fn test_invalid_flag_falls_back() {
        std::env::set_var("FAULTLOG_TRUST_PROXY", "sometimes");
        let config = Config::from_env();
        assert!(!config.trust_proxy_headers);
        std::env::remove_var("FAULTLOG_TRUST_PROXY");
    }

    #[test]
    fn test_config_into_arc() {
        let arc_config = Config::new(false).into_arc();
        assert!(!arc_config.include_headers);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.file_prefix, "Logs");
        assert!(config.log_dir.is_none());
        assert!(!config.quiet_framework);
    }

    #[test]
    fn test_logging_config_from_env() {
        std::env::set_var("FAULTLOG_LOG_PREFIX", "Orders");
        std::env::set_var("FAULTLOG_LEVEL", "  ");
        let config = LoggingConfig::from_env();
        assert_eq!(config.file_prefix, "Orders");
        assert_eq!(config.level, "info");
        std::env::remove_var("FAULTLOG_LOG_PREFIX");
        std::env::remove_var("FAULTLOG_LEVEL");
    }

    #[test]
    fn test_with_log_dir() {
        let config = LoggingConfig::default().with_log_dir("Logs");
        assert_eq!(config.log_dir, Some(PathBuf::from("Logs")));
    }
}
