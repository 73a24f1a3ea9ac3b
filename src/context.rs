//! Read-only view of a failed request handed to the reporter

use crate::exception::ExceptionRecord;

/// Everything the reporter may print about one unhandled failure
///
/// Every field may be absent; the reporter renders missing values as
/// empty lines instead of failing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExceptionContext<'a> {
    /// Full request URL as shown to the user (`scheme://host/path?query`)
    pub display_url: Option<&'a str>,

    /// Client address as seen by the server or trusted proxy
    pub remote_addr: Option<&'a str>,

    /// Request headers in the order they should be printed
    pub headers: &'a [(String, String)],

    /// The outermost failure
    pub exception: Option<&'a ExceptionRecord>,
}

impl<'a> ExceptionContext<'a> {
    pub fn new(exception: &'a ExceptionRecord) -> Self {
        Self {
            exception: Some(exception),
            ..Self::default()
        }
    }

    pub fn with_display_url(mut self, url: &'a str) -> Self {
        self.display_url = Some(url);
        self
    }

    pub fn with_remote_addr(mut self, addr: &'a str) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn with_headers(mut self, headers: &'a [(String, String)]) -> Self {
        self.headers = headers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let ctx = ExceptionContext::default();
        assert!(ctx.display_url.is_none());
        assert!(ctx.remote_addr.is_none());
        assert!(ctx.headers.is_empty());
        assert!(ctx.exception.is_none());
    }

    #[test]
    fn test_builder() {
        let record = ExceptionRecord::new("disk full");
        let headers = vec![("accept".to_string(), "*/*".to_string())];
        let ctx = ExceptionContext::new(&record)
            .with_display_url("https://example.com/orders")
            .with_remote_addr("203.0.113.5")
            .with_headers(&headers);

        assert_eq!(ctx.display_url, Some("https://example.com/orders"));
        assert_eq!(ctx.remote_addr, Some("203.0.113.5"));
        assert_eq!(ctx.headers.len(), 1);
        assert_eq!(ctx.exception.map(|e| e.message()), Some("disk full"));
    }
}
