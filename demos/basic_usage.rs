//! Basic usage example for faultlog Actix
//!
//! Demonstrates the middleware reporting unhandled handler errors into a
//! console + daily-rolling file log.
//!
//! Run with:
//! ```bash
//! FAULTLOG_LOG_DIR=Logs RUST_BACKTRACE=1 cargo run --example basic_usage
//! ```

use actix_web::{web, App, HttpResponse, HttpServer};
use faultlog_actix::{
    config::LoggingConfig, logging, ExceptionRecord, ExceptionReporterMiddleware, UnhandledError,
};
use std::fmt;

#[derive(Debug)]
struct OrderError {
    cause: std::io::Error,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("could not save order")
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello faultlog!")
}

async fn create_order() -> Result<HttpResponse, UnhandledError> {
    let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    Err(UnhandledError::from(OrderError { cause })
        .with_help_link("https://docs.example.com/orders#storage"))
}

async fn read_config() -> Result<HttpResponse, UnhandledError> {
    let body = std::fs::read_to_string("does-not-exist.toml")?;
    Ok(HttpResponse::Ok().body(body))
}

async fn nested() -> Result<HttpResponse, UnhandledError> {
    let record = ExceptionRecord::new("payment declined")
        .with_inner(ExceptionRecord::new("gateway timeout").with_inner(ExceptionRecord::new("connection reset")));
    Err(UnhandledError::from_record(record))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _guard = match logging::init(&LoggingConfig::from_env()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    tracing::info!("Starting example server on http://0.0.0.0:8080");
    tracing::info!("Try: GET /  POST /orders  GET /config  GET /nested");

    HttpServer::new(|| {
        App::new()
            .wrap(ExceptionReporterMiddleware::new())
            .service(web::resource("/").route(web::get().to(index)))
            .service(web::resource("/orders").route(web::post().to(create_order)))
            .service(web::resource("/config").route(web::get().to(read_config)))
            .service(web::resource("/nested").route(web::get().to(nested)))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
