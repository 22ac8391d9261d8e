//! Cookie header codec.
//!
//! # Responsibilities
//! - Parse `Cookie` request headers (`a=1; b=2`) into an ordered jar
//! - Parse `Set-Cookie` response entries (`a=1; Path=/`) into an ordered jar
//! - Serialize a jar back into either wire form
//! - Build deletion instructions for cookies stored on the client
//!
//! # Design Decisions
//! - Parsing never fails: malformed segments are skipped or get an empty value
//! - Duplicate names keep their first position, last value wins
//! - Values are kept verbatim (no percent-decoding)
//! - Response entries keep their attribute suffix so kept cookies are
//!   re-emitted exactly as the application wrote them

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

/// A single cookie as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    /// `Set-Cookie` attributes (`Path=/; HttpOnly`), absent in request form.
    attributes: Option<String>,
}

impl Cookie {
    /// Create a cookie without attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn attributes(&self) -> Option<&str> {
        self.attributes.as_deref()
    }

    /// Render as `name=value`.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Render as a `Set-Cookie` entry, attributes included.
    pub fn to_set_cookie(&self) -> String {
        match &self.attributes {
            Some(attrs) => format!("{}={}; {}", self.name, self.value, attrs),
            None => self.pair(),
        }
    }

    /// Parse a `name=value` pair. Returns `None` for segments without a name.
    fn parse_pair(segment: &str) -> Option<Self> {
        let segment = segment.trim();
        let (name, value) = match segment.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (segment, ""),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }

    /// Parse one `Set-Cookie` entry: the pair up to the first `;`, then attributes.
    fn parse_set_cookie(entry: &str) -> Option<Self> {
        let (pair, attributes) = match entry.split_once(';') {
            Some((pair, attrs)) => (pair, Some(attrs.trim())),
            None => (entry, None),
        };
        let mut cookie = Self::parse_pair(pair)?;
        cookie.attributes = attributes.filter(|a| !a.is_empty()).map(str::to_string);
        Some(cookie)
    }
}

/// Build a `Set-Cookie` entry that clears `name` on the client.
pub fn deletion_instruction(name: &str) -> String {
    ::cookie::Cookie::build((name, "")).removal().build().to_string()
}

/// Ordered collection of cookies with unique names.
///
/// Built once by a parse and never mutated afterwards; filtering yields a new jar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
    /// Name to position in `cookies`.
    index: HashMap<String, usize>,
}

impl CookieJar {
    /// Parse the request form: `name=value` pairs separated by `;`.
    pub fn parse_request(raw: &str) -> Self {
        let mut jar = Self::default();
        for cookie in raw.split(';').filter_map(Cookie::parse_pair) {
            jar.put(cookie);
        }
        jar
    }

    /// Parse the response form: newline-separated `Set-Cookie` entries.
    pub fn parse_set_cookie(raw: &str) -> Self {
        let mut jar = Self::default();
        for cookie in raw.lines().filter_map(Cookie::parse_set_cookie) {
            jar.put(cookie);
        }
        jar
    }

    /// Collect every `Cookie` header of a request. Non UTF-8 values are ignored.
    pub fn from_request_headers(headers: &HeaderMap) -> Self {
        let raw = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("; ");
        Self::parse_request(&raw)
    }

    /// Collect every `Set-Cookie` header of a response. Non UTF-8 values are ignored.
    pub fn from_response_headers(headers: &HeaderMap) -> Self {
        let raw = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse_set_cookie(&raw)
    }

    /// Request form: `a=1; b=2`.
    pub fn to_request_string(&self) -> String {
        self.cookies
            .iter()
            .map(Cookie::pair)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Response form: one `Set-Cookie` entry per line.
    pub fn to_set_cookie_string(&self) -> String {
        self.cookies
            .iter()
            .map(Cookie::to_set_cookie)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&i| self.cookies[i].value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cookies.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// New jar holding the cookies accepted by `keep`, in the original order.
    pub fn retain_names<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        self.cookies
            .iter()
            .filter(|c| keep(&c.name))
            .cloned()
            .collect()
    }

    fn put(&mut self, cookie: Cookie) {
        match self.index.get(&cookie.name) {
            Some(&i) => self.cookies[i] = cookie,
            None => {
                self.index.insert(cookie.name.clone(), self.cookies.len());
                self.cookies.push(cookie);
            }
        }
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut jar = Self::default();
        for cookie in iter {
            jar.put(cookie);
        }
        jar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use axum::http::HeaderValue;

    #[test]
    fn test_parse_request_form() {
        let jar = CookieJar::parse_request("foo=1; bar=2;baz=3");
        assert_eq!(jar.len(), 3);
        assert_eq!(jar.get("foo"), Some("1"));
        assert_eq!(jar.get("baz"), Some("3"));
        assert_eq!(jar.names().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_request_form_round_trip_preserves_order() {
        let raw = "zeta=1; alpha=2; mid=three";
        assert_eq!(CookieJar::parse_request(raw).to_request_string(), raw);
    }

    #[test]
    fn test_malformed_segments_degrade() {
        let jar = CookieJar::parse_request(" ; lonely ; =orphan; key= ; a=b=c");
        assert_eq!(jar.get("lonely"), Some(""));
        assert_eq!(jar.get("key"), Some(""));
        // Only the first `=` separates name and value.
        assert_eq!(jar.get("a"), Some("b=c"));
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(CookieJar::parse_request("").is_empty());
        assert!(CookieJar::parse_set_cookie("").is_empty());
        assert!(CookieJar::from_request_headers(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let jar = CookieJar::parse_request("a=1; b=2; a=3");
        assert_eq!(jar.get("a"), Some("3"));
        assert_eq!(jar.to_request_string(), "a=3; b=2");
    }

    #[test]
    fn test_parse_set_cookie_keeps_attributes() {
        let jar = CookieJar::parse_set_cookie("cookie_limiter=rejected; path=/;\ngithub.com=bot");
        assert_eq!(jar.get("cookie_limiter"), Some("rejected"));
        assert_eq!(jar.get("github.com"), Some("bot"));

        let first = jar.iter().next().unwrap();
        assert_eq!(first.attributes(), Some("path=/;"));
        assert_eq!(
            jar.to_set_cookie_string(),
            "cookie_limiter=rejected; path=/;\ngithub.com=bot"
        );
    }

    #[test]
    fn test_values_are_not_decoded() {
        let jar = CookieJar::parse_request("q=a%20b");
        assert_eq!(jar.get("q"), Some("a%20b"));
    }

    #[test]
    fn test_from_headers_joins_multiple_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("s=1; Path=/"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("t=2; HttpOnly"));

        let request = CookieJar::from_request_headers(&headers);
        assert_eq!(request.to_request_string(), "a=1; b=2");

        let response = CookieJar::from_response_headers(&headers);
        assert_eq!(response.names().collect::<Vec<_>>(), vec!["s", "t"]);
        assert_eq!(response.iter().nth(1).unwrap().to_set_cookie(), "t=2; HttpOnly");
    }

    #[test]
    fn test_retain_names_returns_new_jar() {
        let jar = CookieJar::parse_request("a=1; b=2; c=3");
        let kept = jar.retain_names(|name| name != "b");
        assert_eq!(kept.to_request_string(), "a=1; c=3");
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn test_deletion_instruction() {
        let entry = deletion_instruction("tracker");
        assert!(entry.starts_with("tracker=;"));
        assert!(entry.contains("Max-Age=0"));
        assert!(entry.contains("Expires="));
    }

    #[test]
    fn test_many_distinct_names_parse_in_linear_time() {
        let raw = (0..50_000)
            .map(|i| format!("c{i}="))
            .collect::<Vec<_>>()
            .join(";");

        let start = Instant::now();
        let jar = CookieJar::parse_request(&raw);
        let elapsed = start.elapsed();

        assert_eq!(jar.len(), 50_000);
        assert_eq!(jar.get("c49999"), Some(""));
        assert!(elapsed < Duration::from_secs(2), "parse took {elapsed:?}");
    }

    #[test]
    fn test_filtered_jar_lookups() {
        let jar = CookieJar::parse_request("a=1; b=2; c=3").retain_names(|name| name != "a");
        assert!(!jar.contains("a"));
        assert_eq!(jar.get("c"), Some("3"));
        assert_eq!(jar.names().collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
