//! Consent resolution.
//!
//! The consent cookie holds the client's decision. Any value containing
//! `accepted` (case-insensitive) grants consent, any other value denies it,
//! and a missing cookie means no decision was made yet.

use serde::{Deserialize, Serialize};

use crate::policy::cookie::CookieJar;

/// The client's cookie-policy decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentState {
    /// No consent cookie was sent.
    Unset,
    Accepted,
    Rejected,
}

impl ConsentState {
    /// Resolve the decision recorded under `token` in `jar`.
    pub fn resolve(jar: &CookieJar, token: &str) -> Self {
        match jar.get(token) {
            None => Self::Unset,
            Some(value) if value.to_ascii_lowercase().contains("accepted") => Self::Accepted,
            Some(_) => Self::Rejected,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ConsentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether cookies may flow for this exchange.
///
/// A response that is itself setting an accepting consent cookie counts, so the
/// response granting consent is not stripped.
pub fn is_allowed(request: &CookieJar, response: &CookieJar, token: &str) -> bool {
    ConsentState::resolve(request, token).is_accepted()
        || ConsentState::resolve(response, token).is_accepted()
}
