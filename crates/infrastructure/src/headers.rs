//! Adapter from `http` requests to [`RequestHeaders`]

use application::RequestHeaders;
use http::{HeaderMap, Request};

/// Borrowed view of an `http` header map
///
/// Values that are not visible ASCII read as absent.
#[derive(Debug, Clone, Copy)]
pub struct HttpHeaders<'a>(&'a HeaderMap);

impl<'a> HttpHeaders<'a> {
    /// Wrap a header map
    pub const fn new(headers: &'a HeaderMap) -> Self {
        Self(headers)
    }
}

impl<'a> From<&'a HeaderMap> for HttpHeaders<'a> {
    fn from(headers: &'a HeaderMap) -> Self {
        Self(headers)
    }
}

impl<'a, B> From<&'a Request<B>> for HttpHeaders<'a> {
    fn from(request: &'a Request<B>) -> Self {
        Self(request.headers())
    }
}

impl RequestHeaders for HttpHeaders<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|value| value.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn reads_header_case_insensitively() {
        let request = Request::builder()
            .header("X-Fault-Abort", "503")
            .body(())
            .unwrap();
        let headers = HttpHeaders::from(&request);

        assert_eq!(headers.header("x-fault-abort"), Some("503"));
        assert_eq!(headers.header("X-FAULT-ABORT"), Some("503"));
        assert_eq!(headers.header("x-fault-delay"), None);
    }

    #[test]
    fn opaque_values_read_as_absent() {
        let mut map = HeaderMap::new();
        map.insert("x-fault-abort", HeaderValue::from_bytes(b"\xff").unwrap());
        assert_eq!(HttpHeaders::new(&map).header("x-fault-abort"), None);
    }

    #[test]
    fn invalid_header_name_reads_as_absent() {
        let map = HeaderMap::new();
        assert_eq!(HttpHeaders::from(&map).header("not a header"), None);
    }
}
