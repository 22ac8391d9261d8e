//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demonstration handlers
//! - Wire up middleware (tracing, cookie limiter)
//! - Bind server to listener and shut down gracefully
//!
//! # Routes
//! - `GET /` plain text
//! - `GET /consent` JSON view of what the application receives
//! - `POST /consent/accept`, `POST /consent/reject` record the decision
//! - `GET /track` sets a non-essential cookie

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use cookie::time::{Duration, OffsetDateTime};
use cookie::Cookie;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::layer::CookieLimiterLayer;
use crate::lifecycle::signals::shutdown_signal;
use crate::policy::{Consent, ConsentExt, ConsentState, CookiePolicy};

/// Consent cookie lifetime when no explicit expiry is configured (one year).
const CONSENT_MAX_AGE_SECS: i64 = 365 * 24 * 60 * 60;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<CookiePolicy>,
}

/// HTTP server for the demonstration application.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let policy = Arc::new(CookiePolicy::new(&config.policy));
        let router = Self::build_router(policy);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(policy: Arc<CookiePolicy>) -> Router {
        let state = AppState {
            policy: policy.clone(),
        };

        Router::new()
            .route("/", get(index))
            .route("/consent", get(consent_status))
            .route("/consent/accept", post(accept))
            .route("/consent/reject", post(reject))
            .route("/track", get(track))
            .with_state(state)
            .layer(CookieLimiterLayer::from_shared(policy))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until ctrl-c or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            consent_token = %self.config.policy.consent_token,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn index() -> &'static str {
    "ok"
}

/// Reports the decision and the cookies that reached the application.
async fn consent_status(consent: Consent, headers: HeaderMap) -> impl IntoResponse {
    let cookies = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    Json(json!({
        "consent": consent.consent(),
        "accepted": consent.cookies_accepted(),
        "rejected": consent.cookies_rejected(),
        "cookies": cookies,
    }))
}

async fn accept(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, consent_cookie(&state.policy, ConsentState::Accepted))],
        "accepted",
    )
}

async fn reject(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, consent_cookie(&state.policy, ConsentState::Rejected))],
        "rejected",
    )
}

async fn track(consent: Consent) -> impl IntoResponse {
    let mut status = "tracking";
    consent.if_cookies_rejected(|| status = "tracking withheld");
    let tracker = Cookie::build(("tracker", "demo")).path("/").http_only(true).build();
    ([(header::SET_COOKIE, tracker.to_string())], status)
}

fn consent_cookie(policy: &CookiePolicy, decision: ConsentState) -> String {
    let builder = Cookie::build((policy.consent_token(), decision.as_str())).path("/");
    let expires = policy
        .expires()
        .and_then(|at| OffsetDateTime::from_unix_timestamp(at.timestamp()).ok());
    let builder = match expires {
        Some(at) => builder.expires(at),
        None => builder.max_age(Duration::seconds(CONSENT_MAX_AGE_SECS)),
    };
    builder.build().to_string()
}
