//! Timeout enforcement for upstream calls.
//!
//! # Responsibilities
//! - Issue one JSON POST per attempt
//! - Bound the whole attempt (headers and body) by the attempt deadline
//! - Classify the result into an `UpstreamOutcome`
//!
//! # Design Decisions
//! - Uses `tokio::time::timeout`; on expiry the request future is dropped,
//!   which closes the in-flight connection and frees the timer
//! - Metadata (status, content type, request id) is captured before the
//!   body is read
//! - Bodies are buffered in memory, never streamed back

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time;

use crate::config::UpstreamConfig;
use crate::upstream::types::{best_effort_json, UpstreamOutcome, UpstreamReply, UPSTREAM_REQUEST_ID_HEADERS};

/// One iteration of the retry loop. Owned by the retry policy.
#[derive(Debug, Clone, Copy)]
pub struct CallAttempt {
    /// Zero-based attempt index.
    pub index: u32,
    pub started_at: Instant,
    pub deadline: Duration,
}

impl CallAttempt {
    pub fn new(index: u32, deadline: Duration) -> Self {
        Self {
            index,
            started_at: Instant::now(),
            deadline,
        }
    }

    pub fn deadline_ms(&self) -> u64 {
        u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Single outbound HTTP call bounded by a deadline.
#[derive(Debug, Clone)]
pub struct TimedCall {
    client: reqwest::Client,
}

impl TimedCall {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self { client: builder.build()? })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST `payload` as JSON to `url`, giving up after `attempt.deadline`.
    pub async fn post_json(&self, attempt: &CallAttempt, url: &str, payload: &Value) -> UpstreamOutcome {
        match time::timeout(attempt.deadline, self.send(url, payload)).await {
            Ok(outcome) => outcome,
            Err(_) => UpstreamOutcome::Timeout {
                after_ms: attempt.deadline_ms(),
            },
        }
    }

    async fn send(&self, url: &str, payload: &Value) -> UpstreamOutcome {
        let response = match self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return UpstreamOutcome::NetworkFailure {
                    cause: error_chain(&e),
                }
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let upstream_request_id = upstream_request_id(response.headers());

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return UpstreamOutcome::NetworkFailure {
                    cause: error_chain(&e),
                }
            }
        };

        if !status.is_success() {
            return UpstreamOutcome::HttpError {
                status: status.as_u16(),
                upstream_request_id,
                body: best_effort_json(&String::from_utf8_lossy(&body)),
            };
        }

        UpstreamOutcome::Success(UpstreamReply {
            status: status.as_u16(),
            content_type,
            body,
            upstream_request_id,
        })
    }
}

/// First non-empty request id among the accepted header names.
pub fn upstream_request_id(headers: &HeaderMap) -> Option<String> {
    UPSTREAM_REQUEST_ID_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
