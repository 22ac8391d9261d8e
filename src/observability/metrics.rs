//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cookie_limiter_requests_total` (counter): requests by resolved consent
//! - `cookie_limiter_cookies_stripped_total` (counter): cookies removed, by direction
//! - `cookie_limiter_cookies_deleted_total` (counter): deletion instructions sent
//!
//! # Design Decisions
//! - Prometheus exporter is opt-in through config
//! - Recording without an installed recorder is a no-op

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::policy::ConsentState;

/// Which side of the exchange lost cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_consent(state: ConsentState) {
    counter!("cookie_limiter_requests_total", "consent" => state.as_str()).increment(1);
}

pub fn record_stripped(direction: Direction, count: usize) {
    if count == 0 {
        return;
    }
    counter!("cookie_limiter_cookies_stripped_total", "direction" => direction.as_str())
        .increment(count as u64);
}

pub fn record_deleted(count: usize) {
    if count == 0 {
        return;
    }
    counter!("cookie_limiter_cookies_deleted_total").increment(count as u64);
}
