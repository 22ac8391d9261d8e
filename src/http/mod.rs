//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → layer.rs (cookie limiter: request phase)
//!     → application handlers
//!     → layer.rs (cookie limiter: response phase, envelope finish)
//!     → Send to client
//! ```

pub mod layer;
pub mod server;

pub use layer::{CookieLimiter, CookieLimiterLayer, Exchange, REVALIDATE};
pub use server::HttpServer;
