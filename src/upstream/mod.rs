//! Upstream order forwarding.
//!
//! # Data Flow
//! ```text
//! OrderProxy::forward(destination, payload)
//!     → RetryPolicy::run
//!         → TimedCall::post_json (per attempt)
//!         → UpstreamOutcome::into_result
//!     → Result<UpstreamReply, CallFailure> (handed to the response normalizer)
//! ```
//!
//! Each forward owns its own attempt sequence. The only shared state is the
//! pooled HTTP client and the immutable policy.

pub mod types;

use serde_json::Value;

use crate::observability::metrics;
use crate::resilience::{RetryPolicy, TimedCall};

pub use types::{CallFailure, ProxyError, UpstreamOutcome, UpstreamReply};

#[derive(Debug, Clone)]
pub struct OrderProxy {
    caller: TimedCall,
    policy: RetryPolicy,
}

impl OrderProxy {
    pub fn new(caller: TimedCall, policy: RetryPolicy) -> Self {
        Self { caller, policy }
    }

    /// Forward one payload, retrying per policy.
    pub async fn forward(&self, destination: &str, payload: &Value) -> Result<UpstreamReply, CallFailure> {
        let caller = &self.caller;
        self.policy
            .run(|attempt| async move {
                let outcome = caller.post_json(&attempt, destination, payload).await;
                tracing::debug!(
                    destination = %destination,
                    attempt = attempt.index,
                    elapsed_ms = attempt.started_at.elapsed().as_millis() as u64,
                    outcome = outcome.label(),
                    "Upstream attempt finished"
                );
                metrics::record_attempt(outcome.label());
                outcome.into_result()
            })
            .await
    }
}
