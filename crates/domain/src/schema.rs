//! Fault injection configuration as it appears in route rules
//!
//! These shapes mirror the `HTTPFaultInjection` message: mutually exclusive
//! alternatives arrive as independent optional fields. Converting them into a
//! [`FaultPolicy`] is the single validation boundary; afterwards the
//! alternatives are real enums and every value is in range.
//!
//! Field names are snake_case, with the lowerCamelCase proto JSON names
//! accepted as aliases.
//!
//! ```
//! use domain::{FaultPolicy, HttpFaultInjectionConfig};
//!
//! let config: HttpFaultInjectionConfig = serde_json::from_str(
//!     r#"{"abort": {"percent": 10, "httpStatus": 400}}"#,
//! ).expect("valid json");
//! let policy = FaultPolicy::try_from(config).expect("valid policy");
//! assert!(policy.abort.is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::entities::{AbortCode, AbortSpec, DelayKind, DelaySpec, FaultPolicy};
use crate::errors::DomainError;
use crate::value_objects::{Percent, ProtoDuration};

/// Lowest HTTP status accepted as an abort code
const MIN_HTTP_STATUS: i32 = 100;

/// Highest HTTP status accepted as an abort code
const MAX_HTTP_STATUS: i32 = 599;

/// Faults to inject while forwarding HTTP requests of a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpFaultInjectionConfig {
    /// Delay requests before forwarding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelayConfig>,

    /// Abort requests with an error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort: Option<AbortConfig>,
}

/// Unvalidated delay fault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelayConfig {
    /// Percentage of requests to delay (0-100); all requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,

    /// Fixed delay
    #[serde(default, alias = "fixedDelay", skip_serializing_if = "Option::is_none")]
    pub fixed_delay: Option<ProtoDuration>,

    /// Mean of an exponentially distributed delay
    #[serde(
        default,
        alias = "exponentialDelay",
        skip_serializing_if = "Option::is_none"
    )]
    pub exponential_delay: Option<ProtoDuration>,

    /// Request header that overrides the delay
    #[serde(
        default,
        alias = "overrideHeaderName",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_header_name: Option<String>,
}

/// Unvalidated abort fault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbortConfig {
    /// Percentage of requests to abort (0-100); all requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,

    /// gRPC status to return
    #[serde(default, alias = "grpcStatus", skip_serializing_if = "Option::is_none")]
    pub grpc_status: Option<String>,

    /// HTTP/2 error to return
    #[serde(default, alias = "http2Error", skip_serializing_if = "Option::is_none")]
    pub http2_error: Option<String>,

    /// HTTP status to return
    #[serde(default, alias = "httpStatus", skip_serializing_if = "Option::is_none")]
    pub http_status: Option<i32>,

    /// Request header that overrides the abort code
    #[serde(
        default,
        alias = "overrideHeaderName",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_header_name: Option<String>,
}

impl TryFrom<HttpFaultInjectionConfig> for FaultPolicy {
    type Error = DomainError;

    fn try_from(config: HttpFaultInjectionConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            delay: config.delay.map(DelaySpec::try_from).transpose()?,
            abort: config.abort.map(AbortSpec::try_from).transpose()?,
        })
    }
}

impl TryFrom<DelayConfig> for DelaySpec {
    type Error = DomainError;

    fn try_from(config: DelayConfig) -> Result<Self, Self::Error> {
        let kind = match (config.fixed_delay, config.exponential_delay) {
            (Some(_), Some(_)) => {
                return Err(DomainError::invalid_policy(
                    "delay",
                    "fixed_delay and exponential_delay are mutually exclusive",
                ));
            },
            (Some(fixed), None) => Some(DelayKind::Fixed(non_negative("delay.fixed_delay", fixed)?)),
            (None, Some(mean)) => Some(DelayKind::Exponential {
                mean: non_negative("delay.exponential_delay", mean)?,
            }),
            (None, None) => None,
        };

        Ok(Self {
            percent: validate_percent("delay.percent", config.percent)?,
            kind,
            override_header_name: header_name(config.override_header_name),
        })
    }
}

impl TryFrom<AbortConfig> for AbortSpec {
    type Error = DomainError;

    fn try_from(config: AbortConfig) -> Result<Self, Self::Error> {
        let set: Vec<&str> = [
            config.grpc_status.as_ref().map(|_| "grpc_status"),
            config.http2_error.as_ref().map(|_| "http2_error"),
            config.http_status.as_ref().map(|_| "http_status"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if set.len() > 1 {
            return Err(DomainError::invalid_policy(
                "abort",
                format!("only one error type may be set, found {}", set.join(", ")),
            ));
        }

        let code = if let Some(status) = config.grpc_status {
            Some(AbortCode::GrpcStatus(non_empty("abort.grpc_status", status)?))
        } else if let Some(error) = config.http2_error {
            Some(AbortCode::Http2Error(non_empty("abort.http2_error", error)?))
        } else if let Some(status) = config.http_status {
            Some(AbortCode::HttpStatus(http_status(status)?))
        } else {
            None
        };

        Ok(Self {
            percent: validate_percent("abort.percent", config.percent)?,
            code,
            override_header_name: header_name(config.override_header_name),
        })
    }
}

fn validate_percent(field: &str, value: Option<f64>) -> Result<Option<Percent>, DomainError> {
    value
        .map(|v| Percent::new(v).map_err(|e| DomainError::invalid_policy(field, e)))
        .transpose()
}

fn non_negative(field: &str, value: ProtoDuration) -> Result<std::time::Duration, DomainError> {
    value.to_std().ok_or_else(|| {
        DomainError::invalid_policy(field, format!("negative duration {value}"))
    })
}

fn non_empty(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::invalid_policy(field, "must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn http_status(status: i32) -> Result<u16, DomainError> {
    if !(MIN_HTTP_STATUS..=MAX_HTTP_STATUS).contains(&status) {
        return Err(DomainError::invalid_policy(
            "abort.http_status",
            format!("{status} is not in {MIN_HTTP_STATUS}..={MAX_HTTP_STATUS}"),
        ));
    }
    u16::try_from(status).map_err(|e| DomainError::invalid_policy("abort.http_status", e))
}

/// Empty names are the proto default and mean "no override header"
fn header_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
