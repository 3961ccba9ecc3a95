//! Response normalization.
//!
//! # Responsibilities
//! - Pass a terminal 2xx upstream reply through verbatim
//! - Collapse every terminal upstream failure into one 502 envelope
//! - Report client errors as 400 before any network activity
//!
//! # Design Decisions
//! - Upstream request id always surfaces as `x-upstream-request-id`
//!   (empty when upstream sent none)
//! - Failure status is 502 regardless of the upstream's own status
//! - Callers branch only on `reason`

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::upstream::types::best_effort_json;
use crate::upstream::{CallFailure, ProxyError, UpstreamReply};

pub const X_UPSTREAM_REQUEST_ID: HeaderName = HeaderName::from_static("x-upstream-request-id");
pub const UPSTREAM_CALL_FAILED: &str = "UPSTREAM_CALL_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    UpstreamError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::UpstreamError => "upstream_error",
        }
    }
}

/// Body of every 502 returned by the order proxy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureEnvelope {
    pub error: &'static str,
    pub reason: FailureReason,
    pub detail: Value,
}

impl From<&CallFailure> for FailureEnvelope {
    fn from(failure: &CallFailure) -> Self {
        let reason = if failure.is_timeout() {
            FailureReason::Timeout
        } else {
            FailureReason::UpstreamError
        };
        let detail = match failure {
            CallFailure::HttpError { body, .. } => body.clone(),
            CallFailure::NetworkFailure { cause } => best_effort_json(cause),
            CallFailure::Timeout { .. } => Value::String(failure.to_string()),
        };
        Self {
            error: UPSTREAM_CALL_FAILED,
            reason,
            detail,
        }
    }
}

/// Caller-visible result of one proxy call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyResponse {
    Passthrough(UpstreamReply),
    UpstreamFailure(FailureEnvelope),
    ClientError(ProxyError),
}

impl ProxyResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyResponse::Passthrough(reply) => StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK),
            ProxyResponse::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ProxyResponse::ClientError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Metric/log label.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyResponse::Passthrough(_) => "success",
            ProxyResponse::UpstreamFailure(envelope) => envelope.reason.as_str(),
            ProxyResponse::ClientError(_) => "client_error",
        }
    }
}

impl From<Result<UpstreamReply, CallFailure>> for ProxyResponse {
    fn from(result: Result<UpstreamReply, CallFailure>) -> Self {
        match result {
            Ok(reply) => ProxyResponse::Passthrough(reply),
            Err(failure) => ProxyResponse::UpstreamFailure(FailureEnvelope::from(&failure)),
        }
    }
}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        ProxyResponse::ClientError(err)
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ProxyResponse::Passthrough(reply) => {
                let content_type = reply
                    .content_type
                    .as_deref()
                    .and_then(|ct| HeaderValue::from_str(ct).ok())
                    .unwrap_or_else(|| HeaderValue::from_static("application/json"));
                let request_id = reply
                    .upstream_request_id
                    .as_deref()
                    .and_then(|id| HeaderValue::from_str(id).ok())
                    .unwrap_or_else(|| HeaderValue::from_static(""));

                let mut response = Response::new(Body::from(reply.body));
                *response.status_mut() = status;
                response.headers_mut().insert(header::CONTENT_TYPE, content_type);
                response.headers_mut().insert(X_UPSTREAM_REQUEST_ID, request_id);
                response
            }
            ProxyResponse::UpstreamFailure(envelope) => (status, Json(envelope)).into_response(),
            ProxyResponse::ClientError(err) => (status, Json(json!({ "error": err.to_string() }))).into_response(),
        }
    }
}
