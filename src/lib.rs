//! # faultlog Actix
//!
//! Unhandled-error reporting middleware for Actix-Web applications.
//!
//! Every request that ends in an unhandled error produces exactly one
//! error-level log entry describing the failure:
//!
//! ```text
//!     Url: https://example.com/orders
//!     Ip: 203.0.113.5
//!     Error Message: could not save order
//!     Error InnerMessage: disk full
//!     Error HelpLink: https://docs.example.com/storage
//!     Error StackTrace: ...
//! ```
//!
//! It's designed with these principles:
//!
//! - **Fail-safe**: reporting never panics into the request pipeline and never
//!   changes the response or error the application produced
//! - **Complete**: the whole cause chain is written, however deep
//! - **Quiet in production**: request headers are only dumped in debug builds
//!   unless explicitly enabled
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actix_web::{App, HttpServer, web, HttpResponse};
//! use faultlog_actix::{config::LoggingConfig, logging, ExceptionReporterMiddleware, UnhandledError};
//!
//! async fn orders() -> Result<HttpResponse, UnhandledError> {
//!     let body = std::fs::read_to_string("orders.json")?;
//!     Ok(HttpResponse::Ok().body(body))
//! }
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let _guard = logging::init(&LoggingConfig::from_env()).ok().flatten();
//!
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(ExceptionReporterMiddleware::new())
//!             .route("/orders", web::get().to(orders))
//!     })
//!     .bind("0.0.0.0:8080")?
//!     .run()
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! The middleware is configured via environment variables:
//!
//! - `FAULTLOG_INCLUDE_HEADERS`: dump request headers (default: on in debug builds)
//! - `FAULTLOG_REDACT_HEADERS`: mask credential headers when dumping (default: off)
//! - `FAULTLOG_TRUST_PROXY`: take the client IP and URL from proxy headers (default: off)
//! - `FAULTLOG_REPORT_CLIENT_ERRORS`: also report 4xx errors (default: off)
//!
//! The logging pipeline reads `RUST_LOG` / `FAULTLOG_LEVEL`, `FAULTLOG_LOG_DIR`,
//! `FAULTLOG_LOG_PREFIX` and `FAULTLOG_QUIET_FRAMEWORK`.
//!
//! ## Architecture
//!
//! - `middleware`: Actix-Web middleware implementation
//! - `reporter`: diagnostic record assembly and emission
//! - `exception`: exception chain model and the handler error type
//! - `context`: read-only request/failure view given to the reporter
//! - `sink`: logging sinks (`tracing`, in-memory)
//! - `logging`: console and rolling-file logging setup
//! - `config`: environment-based configuration loading
//! - `error`: error types for setup and reporting failures
//! - `utils`: request helpers (URL, client IP, headers)

pub mod config;
pub mod context;
pub mod error;
pub mod exception;
pub mod logging;
pub mod middleware;
pub mod prelude;
pub mod reporter;
pub mod sink;
pub mod utils;

// Re-export main components for easy access
pub use config::Config;
pub use context::ExceptionContext;
pub use error::ReportError;
pub use exception::{ExceptionRecord, UnhandledError};
pub use middleware::ExceptionReporterMiddleware;
pub use reporter::{DiagnosticRecord, ExceptionReporter};
pub use sink::{LogSink, MemorySink, Severity, TracingSink};
