//! Cookie limiter middleware.
//!
//! # Responsibilities
//! - Resolve consent from request cookies and expose it to the application
//! - Strip non-whitelisted request cookies unless consent was accepted
//! - Strip non-whitelisted response cookies, force cache revalidation and
//!   delete stale cookies on the client unless consent is allowed
//! - Normalize the response envelope (bodiless statuses, HEAD)
//!
//! # Design Decisions
//! - The layer shares only `Arc<CookiePolicy>`; every call builds its own `Exchange`
//! - Errors of the wrapped service propagate unchanged
//! - Kept `Set-Cookie` entries are re-emitted one header per cookie

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Response};
use tower::{Layer, Service};

use crate::observability::metrics::{self, Direction};
use crate::policy::{
    deletion_instruction, finish, is_allowed, ConsentState, CookieJar, CookiePolicy,
};

/// Directive sent whenever cookies were withheld from a response.
pub const REVALIDATE: &str = "must-revalidate, max-age=0";

/// Layer applying the cookie consent policy to an inner service.
#[derive(Debug, Clone)]
pub struct CookieLimiterLayer {
    policy: Arc<CookiePolicy>,
}

impl CookieLimiterLayer {
    pub fn new(policy: CookiePolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn from_shared(policy: Arc<CookiePolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for CookieLimiterLayer {
    type Service = CookieLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieLimiter {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Service produced by [`CookieLimiterLayer`].
#[derive(Debug, Clone)]
pub struct CookieLimiter<S> {
    inner: S,
    policy: Arc<CookiePolicy>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CookieLimiter<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        // The clone may not be ready; keep the instance that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let policy = self.policy.clone();

        Box::pin(async move {
            let exchange = Exchange::begin(&policy, &mut request);
            let response = inner.call(request).await?;
            Ok(exchange.complete(&policy, response))
        })
    }
}

/// State of a single request/response pass through the middleware.
#[derive(Debug)]
pub struct Exchange {
    request_jar: CookieJar,
    consent: ConsentState,
    method: Method,
}

impl Exchange {
    /// Request phase: resolve consent, record it, filter the `Cookie` header.
    pub fn begin<B>(policy: &CookiePolicy, request: &mut Request<B>) -> Self {
        let request_jar = CookieJar::from_request_headers(request.headers());
        let consent = ConsentState::resolve(&request_jar, policy.consent_token());

        tracing::debug!(consent = %consent, cookies = request_jar.len(), "Consent resolved");
        metrics::record_consent(consent);
        request.extensions_mut().insert(consent);

        if !consent.is_accepted() && request.headers().contains_key(header::COOKIE) {
            let kept = policy.whitelist().filter(&request_jar);
            let removed = request_jar.len() - kept.len();
            rewrite_cookie_header(request.headers_mut(), &kept);
            if removed > 0 {
                tracing::debug!(kept = kept.len(), removed, "Request cookies filtered");
                metrics::record_stripped(Direction::Request, removed);
            }
        }

        Self {
            request_jar,
            consent,
            method: request.method().clone(),
        }
    }

    /// Response phase: strip and delete cookies when not allowed, then finish.
    pub fn complete<B: Default>(
        self,
        policy: &CookiePolicy,
        mut response: Response<B>,
    ) -> Response<B> {
        let response_jar = CookieJar::from_response_headers(response.headers());

        if !is_allowed(&self.request_jar, &response_jar, policy.consent_token()) {
            let whitelist = policy.whitelist();
            let kept = whitelist.filter(&response_jar);
            let stale = whitelist.non_whitelisted_names(&response_jar, &self.request_jar);
            let headers = response.headers_mut();

            headers.remove(header::SET_COOKIE);
            for cookie in kept.iter() {
                append_set_cookie(headers, cookie.to_set_cookie());
            }
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(REVALIDATE));
            for name in &stale {
                append_set_cookie(headers, deletion_instruction(name));
            }

            tracing::debug!(
                consent = %self.consent,
                kept = kept.len(),
                stripped = response_jar.len() - kept.len(),
                deleted = stale.len(),
                "Response cookies filtered"
            );
            metrics::record_stripped(Direction::Response, response_jar.len() - kept.len());
            metrics::record_deleted(stale.len());
        }

        finish(response, &self.method)
    }
}

fn rewrite_cookie_header(headers: &mut HeaderMap, jar: &CookieJar) {
    headers.remove(header::COOKIE);
    if jar.is_empty() {
        return;
    }
    match HeaderValue::from_str(&jar.to_request_string()) {
        Ok(value) => {
            headers.insert(header::COOKIE, value);
        }
        Err(e) => tracing::warn!(error = %e, "Dropping unencodable Cookie header"),
    }
}

fn append_set_cookie(headers: &mut HeaderMap, entry: String) {
    match HeaderValue::from_str(&entry) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(error = %e, "Dropping unencodable Set-Cookie entry"),
    }
}
