//! Order gateway library.
//!
//! Forwards order payloads to an upstream order endpoint with bounded
//! latency and bounded retries, and normalizes every outcome into one
//! response shape.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orders;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::OrderProxy;
