//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse
//! - Check cookie names are usable on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("consent token must not be empty")]
    EmptyConsentToken,

    #[error("invalid cookie name in {field}: {name:?}")]
    InvalidCookieName { field: &'static str, name: String },

    #[error("duplicate white_list entry: {0}")]
    DuplicateWhitelistEntry(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let policy = &config.policy;
    if policy.consent_token.is_empty() {
        errors.push(ValidationError::EmptyConsentToken);
    } else if !is_cookie_name(&policy.consent_token) {
        errors.push(ValidationError::InvalidCookieName {
            field: "policy.consent_token",
            name: policy.consent_token.clone(),
        });
    }

    let mut seen = HashSet::new();
    for name in &policy.white_list {
        if !is_cookie_name(name) {
            errors.push(ValidationError::InvalidCookieName {
                field: "policy.white_list",
                name: name.clone(),
            });
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateWhitelistEntry(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Cookie names are RFC 6265 tokens: no separators, whitespace or controls.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.policy.consent_token = "bad token".into();
        config.policy.white_list = vec!["ok".into(), "a=b".into(), "ok".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::DuplicateWhitelistEntry("ok".into())));
        assert!(matches!(errors[0], ValidationError::InvalidAddress { .. }));
    }

    #[test]
    fn test_empty_token() {
        let mut config = ServerConfig::default();
        config.policy.consent_token = String::new();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyConsentToken]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "invalid".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_cookie_name_rules() {
        assert!(is_cookie_name("github.com"));
        assert!(is_cookie_name("app_session-1"));
        assert!(!is_cookie_name("a;b"));
        assert!(!is_cookie_name("a b"));
        assert!(!is_cookie_name(""));
    }
}
