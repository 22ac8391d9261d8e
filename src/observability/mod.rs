//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie limiter produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (consent decisions, stripped and deleted cookies)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing
//! - Metrics are cheap counters; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
