//! Response envelope normalization.
//!
//! # Responsibilities
//! - Drop empty `Set-Cookie` headers
//! - Strip body and content headers from bodiless statuses (1xx, 204, 304)
//! - Strip the body of responses to `HEAD` requests
//!
//! # Design Decisions
//! - Any other status passes through untouched

use axum::http::{header, Method, Response, StatusCode};

/// What happens to a response body, decided by status and request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// Status forbids a body: no body, no `Content-Length`/`Content-Type`.
    Bodiless,
    /// Answer to `HEAD`: headers kept, body dropped.
    HeadersOnly,
    PassThrough,
}

impl BodyPolicy {
    pub fn for_exchange(status: StatusCode, method: &Method) -> Self {
        if status.is_informational()
            || status == StatusCode::NO_CONTENT
            || status == StatusCode::NOT_MODIFIED
        {
            Self::Bodiless
        } else if method == Method::HEAD {
            Self::HeadersOnly
        } else {
            Self::PassThrough
        }
    }
}

/// Normalize `response` for a request made with `method`.
pub fn finish<B: Default>(mut response: Response<B>, method: &Method) -> Response<B> {
    drop_empty_set_cookie(&mut response);

    match BodyPolicy::for_exchange(response.status(), method) {
        BodyPolicy::Bodiless => {
            let headers = response.headers_mut();
            headers.remove(header::CONTENT_LENGTH);
            headers.remove(header::CONTENT_TYPE);
            *response.body_mut() = B::default();
        }
        BodyPolicy::HeadersOnly => {
            *response.body_mut() = B::default();
        }
        BodyPolicy::PassThrough => {}
    }

    response
}

fn drop_empty_set_cookie<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    let has_empty = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| v.as_bytes().iter().all(u8::is_ascii_whitespace));
    if !has_empty {
        return;
    }

    let kept: Vec<_> = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter(|v| !v.as_bytes().iter().all(u8::is_ascii_whitespace))
        .cloned()
        .collect();
    headers.remove(header::SET_COOKIE);
    for value in kept {
        headers.append(header::SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    fn response(status: u16) -> Response<Body> {
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::CONTENT_LENGTH, "2")
            .body(Body::from("ok"))
            .unwrap()
    }

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_body_policy() {
        let policy = |status, method: &Method| BodyPolicy::for_exchange(status, method);

        assert_eq!(policy(StatusCode::NO_CONTENT, &Method::GET), BodyPolicy::Bodiless);
        assert_eq!(policy(StatusCode::NOT_MODIFIED, &Method::HEAD), BodyPolicy::Bodiless);
        assert_eq!(policy(StatusCode::PROCESSING, &Method::GET), BodyPolicy::Bodiless);
        assert_eq!(policy(StatusCode::OK, &Method::HEAD), BodyPolicy::HeadersOnly);
        assert_eq!(policy(StatusCode::NOT_FOUND, &Method::POST), BodyPolicy::PassThrough);
    }

    #[tokio::test]
    async fn test_no_content_strips_headers_and_body() {
        let finished = finish(response(204), &Method::GET);
        assert_eq!(finished.status(), StatusCode::NO_CONTENT);
        assert!(finished.headers().get(header::CONTENT_TYPE).is_none());
        assert!(finished.headers().get(header::CONTENT_LENGTH).is_none());
        assert!(body_bytes(finished).await.is_empty());
    }

    #[tokio::test]
    async fn test_informational_strips_body() {
        let finished = finish(response(102), &Method::GET);
        assert!(finished.headers().get(header::CONTENT_LENGTH).is_none());
        assert!(body_bytes(finished).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_keeps_headers() {
        let finished = finish(response(200), &Method::HEAD);
        assert_eq!(finished.status(), StatusCode::OK);
        assert_eq!(finished.headers()[header::CONTENT_LENGTH], "2");
        assert!(body_bytes(finished).await.is_empty());
    }

    #[tokio::test]
    async fn test_other_statuses_pass_through() {
        let finished = finish(response(418), &Method::GET);
        assert_eq!(finished.status().as_u16(), 418);
        assert_eq!(body_bytes(finished).await, b"ok");
    }

    #[test]
    fn test_empty_set_cookie_removed() {
        let mut res = response(200);
        res.headers_mut().append(header::SET_COOKIE, HeaderValue::from_static(""));
        res.headers_mut().append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        let finished = finish(res, &Method::GET);
        let values: Vec<_> = finished.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(values, vec!["a=1"]);

        let mut res = response(200);
        res.headers_mut().insert(header::SET_COOKIE, HeaderValue::from_static(""));
        assert!(finish(res, &Method::GET).headers().get(header::SET_COOKIE).is_none());
    }
}
