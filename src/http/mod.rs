//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → order.rs (POST /api/order)
//!         → request.rs (decode body shape, resolve destination)
//!         → upstream (retry over timed call)
//!         → response.rs (normalize to passthrough or 502 envelope)
//!     → catalog.rs (product/user lookups)
//!     → pages.rs (login + gated order page)
//! ```

pub mod catalog;
pub mod order;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ProxyRequest, X_REQUEST_ID};
pub use response::{FailureEnvelope, FailureReason, ProxyResponse, X_UPSTREAM_REQUEST_ID};
pub use server::{AppState, HttpServer};
