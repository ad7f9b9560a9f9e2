//! Abort fault specification
//!
//! Prematurely aborts a request with a pre-specified error code. With
//! `percent` unset every eligible request is aborted.

use std::fmt;

use serde::Serialize;

use crate::value_objects::Percent;

/// Error returned to the caller of an aborted request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AbortCode {
    /// gRPC status code, e.g. `UNAVAILABLE`
    GrpcStatus(String),
    /// HTTP/2 error code, e.g. `REFUSED_STREAM`
    Http2Error(String),
    /// HTTP status code
    HttpStatus(u16),
    /// Raw value of the override header, passed through unparsed
    HeaderValue(String),
}

impl AbortCode {
    /// HTTP status, when the code is one
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(status) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for AbortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrpcStatus(status) => write!(f, "grpc-status {status}"),
            Self::Http2Error(error) => write!(f, "http2-error {error}"),
            Self::HttpStatus(status) => write!(f, "http {status}"),
            Self::HeaderValue(value) => write!(f, "header {value}"),
        }
    }
}

/// Validated abort specification
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AbortSpec {
    /// Share of requests to abort; `None` means all of them
    pub percent: Option<Percent>,

    /// Configured error code; `None` makes the abort a no-op
    pub code: Option<AbortCode>,

    /// Request header whose presence overrides the configured code
    pub override_header_name: Option<String>,
}

impl AbortSpec {
    /// Abort every selected request with an HTTP status
    pub const fn http_status(status: u16) -> Self {
        Self::with_code(AbortCode::HttpStatus(status))
    }

    /// Abort every selected request with a gRPC status
    pub fn grpc_status(status: impl Into<String>) -> Self {
        Self::with_code(AbortCode::GrpcStatus(status.into()))
    }

    /// Abort every selected request with an HTTP/2 error
    pub fn http2_error(error: impl Into<String>) -> Self {
        Self::with_code(AbortCode::Http2Error(error.into()))
    }

    const fn with_code(code: AbortCode) -> Self {
        Self {
            percent: None,
            code: Some(code),
            override_header_name: None,
        }
    }

    /// Set the share of requests to abort
    #[must_use]
    pub const fn with_percent(mut self, percent: Percent) -> Self {
        self.percent = Some(percent);
        self
    }

    /// Set the override header name
    #[must_use]
    pub fn with_override_header(mut self, name: impl Into<String>) -> Self {
        self.override_header_name = Some(name.into());
        self
    }

    /// Selection percentage, resolving an unset value to 100
    #[must_use]
    pub fn effective_percent(&self) -> Percent {
        self.percent.unwrap_or(Percent::ALWAYS)
    }

    /// Override header name, if one is configured
    #[must_use]
    pub fn override_header(&self) -> Option<&str> {
        self.override_header_name.as_deref()
    }
}
