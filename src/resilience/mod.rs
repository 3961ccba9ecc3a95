//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Order forwarded upstream:
//!     → retries.rs (RetryPolicy owns the attempt sequence)
//!     → timeouts.rs (TimedCall, one deadline-bound POST per attempt)
//!     → On failure: backoff.rs (base × 2^index), then next attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Every failure kind is retried the same way
//! - No circuit breaking across requests

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
pub use timeouts::{CallAttempt, TimedCall};
