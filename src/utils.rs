//! Helpers for pulling report fields out of an Actix request

use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;
use std::net::IpAddr;

/// Placeholder for masked header values
pub const REDACTED: &str = "[redacted]";

/// Full request URL: `scheme://host/path?query`
///
/// Scheme and host come from the request itself (request-target, `Host`
/// header, server config). With `trust_proxy` set they follow `Forwarded` /
/// `X-Forwarded-*` through Actix's `ConnectionInfo`.
pub fn display_url(req: &HttpRequest, trust_proxy: bool) -> String {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    if trust_proxy {
        let info = req.connection_info();
        return format!("{}://{}{}", info.scheme(), info.host(), path);
    }

    let config = req.app_config();
    let scheme = req
        .uri()
        .scheme_str()
        .unwrap_or(if config.secure() { "https" } else { "http" });
    let host = header_str(req.headers(), "host")
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or_else(|| config.host());
    format!("{}://{}{}", scheme, host, path)
}

/// Extract the client IP, optionally honoring proxy headers
///
/// With `trust_proxy` set, checks headers in this order:
/// 1. X-Real-IP (set by nginx)
/// 2. X-Forwarded-For (standard proxy header, takes first IP)
///
/// and otherwise falls back to the connection peer address.
pub fn extract_ip(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> Option<String> {
    if trust_proxy {
        if let Some(ip) = header_str(headers, "x-real-ip") {
            return Some(ip.trim().to_string());
        }

        if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
            if let Some(ip) = forwarded.split(',').next().map(str::trim) {
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    peer.map(|ip| ip.to_string())
}

/// One `(name, value)` pair per header name, sorted by name
///
/// Repeated headers are joined with `,`. Non-UTF-8 bytes are replaced
/// rather than dropped.
pub fn collect_headers(headers: &HeaderMap, redact_sensitive: bool) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = headers
        .keys()
        .map(|name| {
            let name = name.as_str().to_string();
            let value = if redact_sensitive && is_sensitive_header(&name) {
                REDACTED.to_string()
            } else {
                headers
                    .get_all(name.as_str())
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            (name, value)
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

/// Headers that carry credentials
pub fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "authorization" | "cookie" | "set-cookie" | "proxy-authorization" | "x-api-key" | "x-auth-token"
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};
    use actix_web::test::TestRequest;

    fn header_map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for &(name, value) in pairs {
            headers.append(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        headers
    }

    fn peer() -> Option<IpAddr> {
        Some("10.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let headers = header_map(&[("x-real-ip", "192.168.1.100")]);
        let ip = extract_ip(&headers, peer(), true);
        assert_eq!(ip, Some("192.168.1.100".to_string()));
    }

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let headers = header_map(&[("x-forwarded-for", "192.168.1.100, 10.0.0.1")]);
        let ip = extract_ip(&headers, peer(), true);
        assert_eq!(ip, Some("192.168.1.100".to_string()));
    }

    #[test]
    fn test_extract_ip_ignores_proxy_headers_by_default() {
        let headers = header_map(&[("x-real-ip", "192.168.1.100")]);
        let ip = extract_ip(&headers, peer(), false);
        assert_eq!(ip, Some("10.0.0.1".to_string()));
    }

    #[test]
    fn test_extract_ip_no_source() {
        let ip = extract_ip(&HeaderMap::new(), None, true);
        assert_eq!(ip, None);
    }

    #[test]
    fn test_collect_headers_sorted_and_joined() {
        let headers = header_map(&[
            ("user-agent", "curl/8.0"),
            ("accept", "text/html"),
            ("accept", "application/json"),
        ]);
        let pairs = collect_headers(&headers, true);
        assert_eq!(
            pairs,
            vec![
                ("accept".to_string(), "text/html,application/json".to_string()),
                ("user-agent".to_string(), "curl/8.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_headers_redaction() {
        let headers = header_map(&[("authorization", "Bearer s3cret"), ("accept", "*/*")]);

        let redacted = collect_headers(&headers, true);
        assert_eq!(redacted[1], ("authorization".to_string(), REDACTED.to_string()));

        let verbatim = collect_headers(&headers, false);
        assert_eq!(verbatim[1], ("authorization".to_string(), "Bearer s3cret".to_string()));
    }

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("Cookie"));
        assert!(is_sensitive_header("x-api-key"));

        assert!(!is_sensitive_header("content-type"));
        assert!(!is_sensitive_header("user-agent"));
    }

    #[test]
    fn test_display_url() {
        let req = TestRequest::get()
            .uri("/orders?page=2")
            .insert_header(("host", "example.com"))
            .to_http_request();
        assert_eq!(display_url(&req, false), "http://example.com/orders?page=2");
    }

    #[test]
    fn test_display_url_ignores_forwarded_headers_by_default() {
        let req = TestRequest::get()
            .uri("/db")
            .insert_header(("host", "example.com"))
            .insert_header(("x-forwarded-host", "evil.test"))
            .insert_header(("x-forwarded-proto", "https"))
            .to_http_request();
        assert_eq!(display_url(&req, false), "http://example.com/db");
        assert_eq!(display_url(&req, true), "https://evil.test/db");
    }

    #[test]
    fn test_display_url_falls_back_to_server_host() {
        let req = TestRequest::get().uri("/db").to_http_request();
        assert_eq!(display_url(&req, false), "http://localhost:8080/db");
    }
}
