//! Host logging pipeline
//!
//! Installs a `tracing` subscriber with an ANSI console layer and, when a
//! log directory is configured, a daily-rolling file layer written through
//! a non-blocking worker. Files are named `<prefix>.<yyyy-mm-dd>.txt`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::ReportError;

/// Framework targets raised to `error` by `quiet_framework`
pub const FRAMEWORK_TARGETS: &[&str] = &["actix_server", "actix_web", "actix_http"];

/// Initialize logging for the host application
///
/// `RUST_LOG` takes precedence over `config.level`. The returned guard
/// flushes the file writer on drop and must be held until shutdown.
///
/// ```rust,no_run
/// use faultlog_actix::{config::LoggingConfig, logging};
///
/// let _guard = logging::init(&LoggingConfig::from_env().with_log_dir("Logs"))
///     .expect("logging setup failed");
/// ```
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ReportError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());
    let filter = build_filter(&directives, config.quiet_framework)?;

    let console_layer = fmt::layer().with_ansi(config.ansi).with_target(true);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| ReportError::LogDirectory {
                path: dir.clone(),
                source,
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(config.file_prefix.clone())
                .filename_suffix("txt")
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        target: crate::sink::LOG_TARGET,
        log_dir = ?config.log_dir,
        "Logging initialized"
    );

    Ok(guard)
}

/// Parse filter directives, optionally silencing framework chatter
pub fn build_filter(directives: &str, quiet_framework: bool) -> Result<EnvFilter, ReportError> {
    let mut filter = EnvFilter::try_new(directives)?;
    if quiet_framework {
        for target in FRAMEWORK_TARGETS {
            filter = filter.add_directive(format!("{}=error", target).parse()?);
        }
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_plain() {
        let filter = build_filter("info", false).unwrap();
        assert!(!filter.to_string().contains("actix_server"));
    }

    #[test]
    fn test_build_filter_quiet_framework() {
        let filter = build_filter("info", true).unwrap();
        let text = filter.to_string();
        for target in FRAMEWORK_TARGETS {
            assert!(text.contains(&format!("{}=error", target)), "missing {} in {}", target, text);
        }
    }

    #[test]
    fn test_build_filter_rejects_bad_directive() {
        let err = build_filter("orders=loud", false).unwrap_err();
        assert!(matches!(err, ReportError::Filter(_)));
    }

    #[test]
    fn test_init_rejects_unwritable_dir() {
        let file = std::env::temp_dir().join(format!("faultlog-not-a-dir-{}", std::process::id()));
        std::fs::write(&file, b"").unwrap();

        let config = LoggingConfig::default().with_log_dir(file.join("Logs"));
        let err = init(&config).unwrap_err();
        assert!(matches!(err, ReportError::LogDirectory { .. }));

        std::fs::remove_file(&file).unwrap();
    }
}
