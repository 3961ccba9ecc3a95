//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Page request
//!     → session.rs (cookie presence check)
//!     → handler, or 307 to /login?from=<path>
//!
//! POST /api/login
//!     → session.rs (credential check, Set-Cookie)
//! ```

pub mod session;
