//! Cookie consent policy.
//!
//! # Data Flow
//! ```text
//! Request:
//!     Cookie header
//!     → cookie.rs (parse into CookieJar)
//!     → consent.rs (resolve Unset / Accepted / Rejected)
//!     → whitelist.rs (strip non-whitelisted cookies unless Accepted)
//!     → wrapped application
//!
//! Response:
//!     Set-Cookie headers
//!     → cookie.rs (parse into CookieJar)
//!     → consent.rs (request OR response grants consent?)
//!     → whitelist.rs (strip + delete on client when not allowed)
//!     → finish.rs (bodiless statuses, HEAD)
//! ```
//!
//! # Design Decisions
//! - Everything here is pure and infallible; malformed cookies never fail a request
//! - `CookiePolicy` is built once from config and shared read-only
//! - Per-request data lives in the middleware's exchange, never in the policy

pub mod consent;
pub mod cookie;
pub mod finish;
pub mod helpers;
pub mod whitelist;

use chrono::{DateTime, Utc};

use crate::config::CookieLimiterConfig;

pub use consent::{is_allowed, ConsentState};
pub use cookie::{deletion_instruction, Cookie, CookieJar};
pub use finish::{finish, BodyPolicy};
pub use helpers::{Consent, ConsentExt};
pub use whitelist::Whitelist;

/// Immutable, compiled form of [`CookieLimiterConfig`].
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    consent_token: String,
    whitelist: Whitelist,
    expires: Option<DateTime<Utc>>,
}

impl CookiePolicy {
    pub fn new(config: &CookieLimiterConfig) -> Self {
        let whitelist =
            Whitelist::with_token(config.white_list.iter().cloned(), &config.consent_token);
        Self {
            consent_token: config.consent_token.clone(),
            whitelist,
            expires: config.expires,
        }
    }

    /// Name of the cookie holding the consent decision.
    pub fn consent_token(&self) -> &str {
        &self.consent_token
    }

    /// Effective whitelist, consent token included.
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Reserved expiry for the consent cookie. Not used by the policy itself.
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::new(&CookieLimiterConfig::default())
    }
}
