//! Cookie whitelist.
//!
//! # Responsibilities
//! - Hold the cookie names that survive stripping regardless of consent
//! - Filter a jar down to its whitelisted cookies
//! - List the names that must be deleted on the client
//!
//! # Design Decisions
//! - The consent token is always part of the effective whitelist, so the
//!   decision itself is never stripped or deleted
//! - Name matching is exact and case-sensitive (cookie names are)

use std::collections::HashSet;

use crate::policy::cookie::CookieJar;

/// Set of cookie names exempt from stripping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    names: HashSet<String>,
}

impl Whitelist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured names plus the consent token.
    pub fn with_token<I, S>(names: I, token: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut whitelist = Self::new(names);
        whitelist.names.insert(token.to_string());
        whitelist
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whitelisted subset of `jar`, original order preserved.
    pub fn filter(&self, jar: &CookieJar) -> CookieJar {
        jar.retain_names(|name| self.contains(name))
    }

    /// Names present in either jar that are not whitelisted.
    ///
    /// Each name appears once, `first` jar's names before `second`'s.
    pub fn non_whitelisted_names(&self, first: &CookieJar, second: &CookieJar) -> Vec<String> {
        let mut seen = HashSet::new();
        first
            .names()
            .chain(second.names())
            .filter(|name| !self.contains(name))
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}
