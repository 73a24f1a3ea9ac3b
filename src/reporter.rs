//! Diagnostic record assembly and emission
//!
//! One unhandled failure produces one [`DiagnosticRecord`] and exactly one
//! error-severity entry in the sink. The line layout is fixed:
//!
//! ```text
//!     Url: <display url>            (only when present)
//!     Ip: <remote address>
//!     <header>: <value>             (only when headers are enabled)
//!     Error Message: <outermost message>
//!     Error InnerMessage: <message> (one per inner failure, outer to inner)
//!     Error HelpLink: <help link>
//!     Error StackTrace: <stack trace>
//! ```

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::context::ExceptionContext;
use crate::error::ReportError;
use crate::sink::{LogSink, Severity, TracingSink};

pub const URL_LABEL: &str = "Url";
pub const IP_LABEL: &str = "Ip";
pub const MESSAGE_LABEL: &str = "Error Message";
pub const INNER_MESSAGE_LABEL: &str = "Error InnerMessage";
pub const HELP_LINK_LABEL: &str = "Error HelpLink";
pub const STACK_TRACE_LABEL: &str = "Error StackTrace";

/// Ordered `label: value` lines describing one failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticRecord {
    lines: Vec<(String, String)>,
}

impl DiagnosticRecord {
    fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.lines.push((label.into(), value.into()));
    }

    pub fn lines(&self) -> &[(String, String)] {
        &self.lines
    }

    /// Number of lines carrying `label`
    pub fn count_label(&self, label: &str) -> usize {
        self.lines.iter().filter(|(l, _)| l == label).count()
    }
}

/// Renders each line as `\t<label>: <value>\n`
impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in &self.lines {
            writeln!(f, "\t{}: {}", label, value)?;
        }
        Ok(())
    }
}

/// Turns unhandled failures into single error-level log entries
pub struct ExceptionReporter {
    sink: Arc<dyn LogSink>,
    include_headers: bool,
}

impl ExceptionReporter {
    /// Reporter writing to `sink`, with header dumping off
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            include_headers: false,
        }
    }

    /// Enable or disable one line per request header
    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn includes_headers(&self) -> bool {
        self.include_headers
    }

    /// Assemble the record without emitting it
    pub fn build_record(&self, context: &ExceptionContext<'_>) -> DiagnosticRecord {
        let mut record = DiagnosticRecord::default();

        if let Some(url) = context.display_url.filter(|u| !u.is_empty()) {
            record.push(URL_LABEL, url);
        }

        record.push(IP_LABEL, context.remote_addr.unwrap_or_default());

        if self.include_headers {
            for (name, value) in context.headers {
                record.push(name.as_str(), value.as_str());
            }
        }

        let exception = context.exception;
        record.push(MESSAGE_LABEL, exception.map(|e| e.message()).unwrap_or_default());

        if let Some(outer) = exception {
            for inner in outer.chain().skip(1) {
                record.push(INNER_MESSAGE_LABEL, inner.message());
            }
        }

        record.push(
            HELP_LINK_LABEL,
            exception.and_then(|e| e.help_link()).unwrap_or_default(),
        );
        record.push(
            STACK_TRACE_LABEL,
            exception.and_then(|e| e.stack_trace()).unwrap_or_default(),
        );

        record
    }

    /// Build the record and emit it as one error entry
    ///
    /// Never fails: a panic while building or writing the record is
    /// contained and noted on stderr.
    pub fn report(&self, context: &ExceptionContext<'_>) {
        contain(|| {
            let record = self.build_record(context);
            self.sink.log(Severity::Error, &record.to_string());
        });
    }
}

/// Run a reporting step, turning a panic into a stderr note
pub(crate) fn contain(step: impl FnOnce()) {
    if let Err(e) = try_contain(step) {
        eprintln!("[faultlog] Failed to write error report: {}", e);
    }
}

fn try_contain(step: impl FnOnce()) -> Result<(), ReportError> {
    catch_unwind(AssertUnwindSafe(step)).map_err(|payload| ReportError::from_panic(payload.as_ref()))
}

impl Default for ExceptionReporter {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl fmt::Debug for ExceptionReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionReporter")
            .field("include_headers", &self.include_headers)
            .finish_non_exhaustive()
    }
}
