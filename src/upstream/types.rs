//! Upstream call outcomes and proxy error definitions.

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// Request-id headers the upstream may set, checked in order.
pub const UPSTREAM_REQUEST_ID_HEADERS: [&str; 2] = ["x-amzn-requestid", "x-amz-request-id"];

/// A 2xx response read to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub upstream_request_id: Option<String>,
}

/// Result of a single timed call. Exactly one variant per attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Success(UpstreamReply),
    HttpError {
        status: u16,
        upstream_request_id: Option<String>,
        body: Value,
    },
    Timeout {
        after_ms: u64,
    },
    NetworkFailure {
        cause: String,
    },
}

impl UpstreamOutcome {
    /// Split into the value the retry loop returns and the failure it retries on.
    pub fn into_result(self) -> Result<UpstreamReply, CallFailure> {
        match self {
            UpstreamOutcome::Success(reply) => Ok(reply),
            UpstreamOutcome::HttpError {
                status,
                upstream_request_id,
                body,
            } => Err(CallFailure::HttpError {
                status,
                upstream_request_id,
                body,
            }),
            UpstreamOutcome::Timeout { after_ms } => Err(CallFailure::Timeout { after_ms }),
            UpstreamOutcome::NetworkFailure { cause } => Err(CallFailure::NetworkFailure { cause }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success(_) => "success",
            UpstreamOutcome::HttpError { .. } => "http_error",
            UpstreamOutcome::Timeout { .. } => "timeout",
            UpstreamOutcome::NetworkFailure { .. } => "network_failure",
        }
    }
}

/// A failed attempt. Every variant is retried the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallFailure {
    #[error("upstream call timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("upstream network failure: {cause}")]
    NetworkFailure { cause: String },

    #[error("upstream returned status {status}")]
    HttpError {
        status: u16,
        upstream_request_id: Option<String>,
        body: Value,
    },
}

impl CallFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CallFailure::Timeout { .. })
    }
}

/// Client-side problems, reported before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("Bad request: body is not valid JSON ({0})")]
    MalformedBody(String),

    #[error("Missing target URL: provide 'url' in body or set API_BASE_URL")]
    MissingDestination,
}

/// Parse text as JSON when possible, otherwise keep it as a JSON string.
pub fn best_effort_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
