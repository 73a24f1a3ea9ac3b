//! Exception chain model
//!
//! An [`ExceptionRecord`] is the outermost failure plus a linked list of
//! inner ("caused by") records. Chains can be arbitrarily deep, so every
//! walk over them (iteration, `Debug`, `Drop`) is a loop.
//!
//! [`UnhandledError`] is the handler-facing side: return it from an Actix
//! handler and the middleware reports the whole chain, the help link and
//! the captured backtrace.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// One failure and the failures that caused it
pub struct ExceptionRecord {
    message: String,
    help_link: Option<String>,
    stack_trace: Option<String>,
    inner: Option<Box<ExceptionRecord>>,
}

impl ExceptionRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help_link: None,
            stack_trace: None,
            inner: None,
        }
    }

    /// Build a chain from an error and its `source()` ancestry
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let causes: Vec<String> = std::iter::successors(err.source(), |&e| e.source())
            .map(|e| e.to_string())
            .collect();

        // Link from the innermost cause outwards
        let inner = causes.into_iter().rev().fold(None, |inner, message| {
            let mut record = ExceptionRecord::new(message);
            record.inner = inner;
            Some(Box::new(record))
        });

        let mut record = ExceptionRecord::new(err.to_string());
        record.inner = inner;
        record
    }

    pub fn with_help_link(mut self, help_link: impl Into<String>) -> Self {
        self.help_link = Some(help_link.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Set the directly wrapped cause, replacing any previous one
    pub fn with_inner(mut self, inner: ExceptionRecord) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help_link(&self) -> Option<&str> {
        self.help_link.as_deref()
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    pub fn inner(&self) -> Option<&ExceptionRecord> {
        self.inner.as_deref()
    }

    /// Iterate the chain outer to inner, starting with `self`
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Number of records in the chain, including `self`
    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}

impl fmt::Debug for ExceptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionRecord")
            .field("message", &self.message)
            .field("help_link", &self.help_link)
            .field("stack_trace", &self.stack_trace)
            .field("inner_messages", &self.chain().skip(1).map(|r| r.message()).collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for ExceptionRecord {
    fn drop(&mut self) {
        let mut next = self.inner.take();
        while let Some(mut record) = next {
            next = record.inner.take();
        }
    }
}

/// Iterator over an exception chain, outer to inner
pub struct Chain<'a> {
    next: Option<&'a ExceptionRecord>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ExceptionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.inner();
        Some(current)
    }
}

/// Handler error that keeps the full failure chain for reporting
///
/// Any `std::error::Error` converts into it, so handlers can use `?`:
///
/// ```rust,no_run
/// use actix_web::HttpResponse;
/// use faultlog_actix::UnhandledError;
///
/// async fn orders() -> Result<HttpResponse, UnhandledError> {
///     let body = std::fs::read_to_string("orders.json")?;
///     Ok(HttpResponse::Ok().body(body))
/// }
/// ```
///
/// The response sent to the client is a bare status; the message only
/// reaches the logs.
pub struct UnhandledError {
    record: ExceptionRecord,
    status: StatusCode,
}

impl UnhandledError {
    /// Wrap an already-built chain
    pub fn from_record(record: ExceptionRecord) -> Self {
        Self {
            record,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn with_help_link(mut self, help_link: impl Into<String>) -> Self {
        self.record.help_link = Some(help_link.into());
        self
    }

    /// Override the response status (defaults to 500)
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn record(&self) -> &ExceptionRecord {
        &self.record
    }
}

impl<E> From<E> for UnhandledError
where
    E: Error + 'static,
{
    fn from(err: E) -> Self {
        let mut record = ExceptionRecord::from_error(&err);
        record.stack_trace = capture_stack_trace();
        Self::from_record(record)
    }
}

impl fmt::Debug for UnhandledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnhandledError")
            .field("status", &self.status)
            .field("record", &self.record)
            .finish()
    }
}

impl fmt::Display for UnhandledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record.message())
    }
}

impl ResponseError for UnhandledError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status)
    }
}

/// Backtrace text, or `None` when capture is disabled via `RUST_BACKTRACE`
fn capture_stack_trace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
