//! Actix-Web middleware that reports unhandled errors
//!
//! The middleware observes the result of the wrapped service. When a
//! request ends in a reportable error it hands the request context and the
//! error chain to the [`ExceptionReporter`], then returns the original
//! response or error untouched.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpRequest,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::config::Config;
use crate::context::ExceptionContext;
use crate::exception::{ExceptionRecord, UnhandledError};
use crate::reporter::{contain, ExceptionReporter};
use crate::sink::{LogSink, TracingSink};
use crate::utils::{collect_headers, display_url, extract_ip};

/// Unhandled-error reporting middleware for Actix-Web
///
/// Add this middleware to your Actix app via `.wrap()`:
///
/// ```rust,no_run
/// use actix_web::{web, App, HttpResponse};
/// use faultlog_actix::ExceptionReporterMiddleware;
///
/// App::new()
///     .wrap(ExceptionReporterMiddleware::new())
///     .route("/", web::get().to(|| async { HttpResponse::Ok().finish() }));
/// ```
pub struct ExceptionReporterMiddleware {
    config: Arc<Config>,
    reporter: Arc<ExceptionReporter>,
}

impl ExceptionReporterMiddleware {
    /// Environment configuration, reporting through `tracing`
    pub fn new() -> Self {
        Self::with_config(Config::from_env())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Report into a custom sink
    pub fn with_sink(config: Config, sink: Arc<dyn LogSink>) -> Self {
        let reporter = ExceptionReporter::new(sink).include_headers(config.include_headers);
        Self {
            config: config.into_arc(),
            reporter: Arc::new(reporter),
        }
    }
}

impl Default for ExceptionReporterMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExceptionReporterMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ExceptionReporterService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExceptionReporterService {
            service,
            config: self.config.clone(),
            reporter: self.reporter.clone(),
        })
    }
}

/// The actual service that handles each request
pub struct ExceptionReporterService<S> {
    service: S,
    config: Arc<Config>,
    reporter: Arc<ExceptionReporter>,
}

impl<S, B> Service<ServiceRequest> for ExceptionReporterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // An `Err` from the inner service consumes the request, so the
        // context is captured up front
        let snapshot = RequestSnapshot::capture(req.request(), &self.config);
        let config = self.config.clone();
        let reporter = self.reporter.clone();

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        if is_reportable(err, &config) {
                            report_error(&reporter, &snapshot, err);
                        }
                    }
                    Ok(res)
                }
                Err(err) => {
                    if is_reportable(&err, &config) {
                        report_error(&reporter, &snapshot, &err);
                    }
                    Err(err)
                }
            }
        })
    }
}

/// Owned copy of the request fields a report needs
struct RequestSnapshot {
    display_url: String,
    remote_addr: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestSnapshot {
    fn capture(req: &HttpRequest, config: &Config) -> Self {
        let peer = req.peer_addr().map(|addr| addr.ip());
        let headers = if config.include_headers {
            collect_headers(req.headers(), config.redact_sensitive_headers)
        } else {
            Vec::new()
        };

        Self {
            display_url: display_url(req, config.trust_proxy_headers),
            remote_addr: extract_ip(req.headers(), peer, config.trust_proxy_headers),
            headers,
        }
    }

    fn context<'a>(&'a self, exception: &'a ExceptionRecord) -> ExceptionContext<'a> {
        ExceptionContext {
            display_url: Some(self.display_url.as_str()),
            remote_addr: self.remote_addr.as_deref(),
            headers: &self.headers,
            exception: Some(exception),
        }
    }
}

/// Server errors always; client errors only when configured
fn is_reportable(err: &Error, config: &Config) -> bool {
    let status = err.as_response_error().status_code();
    status.is_server_error() || (config.report_client_errors && status.is_client_error())
}

/// Foreign `Display` impls run here, so the whole step is contained
fn report_error(reporter: &ExceptionReporter, snapshot: &RequestSnapshot, err: &Error) {
    contain(|| match err.as_error::<UnhandledError>() {
        Some(unhandled) => reporter.report(&snapshot.context(unhandled.record())),
        None => {
            let record = ExceptionRecord::new(err.to_string());
            reporter.report(&snapshot.context(&record));
        }
    });
}
