//! Consent predicates for application code.
//!
//! The middleware stores the resolved [`ConsentState`] in the request
//! extensions before the application runs. Handlers read it back through
//! [`ConsentExt`] or the [`Consent`] extractor. When the middleware did not
//! run, every predicate answers `false`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, Extensions, Request};

use crate::policy::consent::ConsentState;

/// Read-only access to the per-request consent decision.
pub trait ConsentExt {
    /// The recorded decision, if the middleware ran.
    fn consent(&self) -> Option<ConsentState>;

    fn cookies_accepted(&self) -> bool {
        self.consent() == Some(ConsentState::Accepted)
    }

    fn cookies_rejected(&self) -> bool {
        self.consent() == Some(ConsentState::Rejected)
    }

    /// Run `f` only when cookies were accepted.
    fn if_cookies_accepted<F: FnOnce()>(&self, f: F) -> bool {
        let accepted = self.cookies_accepted();
        if accepted {
            f();
        }
        accepted
    }

    /// Run `f` only when cookies were rejected.
    fn if_cookies_rejected<F: FnOnce()>(&self, f: F) -> bool {
        let rejected = self.cookies_rejected();
        if rejected {
            f();
        }
        rejected
    }
}

impl ConsentExt for Extensions {
    fn consent(&self) -> Option<ConsentState> {
        self.get::<ConsentState>().copied()
    }
}

impl<B> ConsentExt for Request<B> {
    fn consent(&self) -> Option<ConsentState> {
        self.extensions().consent()
    }
}

impl ConsentExt for Parts {
    fn consent(&self) -> Option<ConsentState> {
        self.extensions.consent()
    }
}

/// Extractor for the consent decision. Never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consent(pub Option<ConsentState>);

impl ConsentExt for Consent {
    fn consent(&self) -> Option<ConsentState> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Consent
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Consent(parts.consent()))
    }
}
