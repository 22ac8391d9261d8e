//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast to every running server
//!
//! Signals (signals.rs):
//!     SIGINT or broadcast → graceful shutdown of the HTTP server
//! ```
//!
//! # Design Decisions
//! - Servers stop accepting first, then drain in-flight requests

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
