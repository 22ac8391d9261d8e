//! Cookie consent middleware for axum/tower services.
//!
//! Resolves whether the client accepted, rejected or never answered the
//! cookie policy, and strips every non-whitelisted cookie from requests and
//! responses until consent is accepted.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;

pub use config::{CookieLimiterConfig, ServerConfig};
pub use http::{CookieLimiterLayer, HttpServer};
pub use lifecycle::Shutdown;
pub use policy::{Consent, ConsentExt, ConsentState, CookieJar, CookiePolicy, Whitelist};
