//! Convenience re-exports for easy importing
//!
//! Import everything you need with:
//! ```rust
//! use faultlog_actix::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::context::ExceptionContext;
pub use crate::exception::{ExceptionRecord, UnhandledError};
pub use crate::middleware::ExceptionReporterMiddleware;
pub use crate::reporter::ExceptionReporter;
pub use crate::sink::{LogSink, Severity};
