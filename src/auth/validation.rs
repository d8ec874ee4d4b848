//! Registration and credential input checks

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::auth::models::{normalize_email, LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// A rejected input, carrying the message shown next to the form field
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub missing_fields: Vec<&'static str>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }
}

/// Registration input that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login input with both fields present
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .expect("Invalid regex pattern - this is a bug in the codebase")
    })
}

/// Check a registration payload.
///
/// Checks run in a fixed order and stop at the first failure: required
/// fields, email shape, password length, then name length.
pub fn validate_registration(req: RegisterRequest) -> Result<NewRegistration, ValidationError> {
    let name = req.name.filter(|s| !s.is_empty());
    let email = req.email.filter(|s| !s.is_empty());
    let password = req.password.filter(|s| !s.is_empty());

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("name");
    }
    if email.is_none() {
        missing.push("email");
    }
    if password.is_none() {
        missing.push("password");
    }

    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(ValidationError {
            message: format!("Missing required fields: {}", missing.join(", ")),
            missing_fields: missing,
        });
    };

    let email = normalize_email(&email);
    if !email_pattern().is_match(&email) {
        return Err(ValidationError::new("Invalid email format"));
    }

    validate_password(&password)?;

    let name = name.trim().to_string();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::new(format!(
            "Name must be at least {} characters",
            MIN_NAME_LEN
        )));
    }

    Ok(NewRegistration {
        name,
        email,
        password,
    })
}

/// Check a new password's length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Check a login payload has both fields
pub fn validate_login(req: LoginRequest) -> Result<Credentials, ValidationError> {
    match (
        req.email.filter(|s| !s.trim().is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) {
        (Some(email), Some(password)) => Ok(Credentials {
            email: normalize_email(&email),
            password,
        }),
        _ => Err(ValidationError::new("Email and password are required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: name.map(String::from),
            email: email.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_valid_registration_normalizes() {
        let ok = validate_registration(req(Some(" Al "), Some(" A@B.com "), Some("secret1"))).unwrap();
        assert_eq!(ok.name, "Al");
        assert_eq!(ok.email, "a@b.com");
        assert_eq!(ok.password, "secret1");
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let err = validate_registration(req(None, Some("a@b.com"), None)).unwrap_err();
        assert_eq!(err.message, "Missing required fields: name, password");
        assert_eq!(err.missing_fields, vec!["name", "password"]);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let err = validate_registration(req(Some(""), Some("a@b.com"), Some("secret1"))).unwrap_err();
        assert_eq!(err.missing_fields, vec!["name"]);
    }

    #[test]
    fn test_invalid_email() {
        for email in ["plainaddress", "a@b", "a b@c.com", "@b.com"] {
            let err = validate_registration(req(Some("Al"), Some(email), Some("secret1"))).unwrap_err();
            assert_eq!(err.message, "Invalid email format", "email {:?}", email);
        }
    }

    #[test]
    fn test_short_password() {
        let err = validate_registration(req(Some("Al"), Some("a@b.com"), Some("12345"))).unwrap_err();
        assert_eq!(err.message, "Password must be at least 6 characters");
    }

    #[test]
    fn test_email_checked_before_password() {
        let err = validate_registration(req(Some("Al"), Some("bad"), Some("1"))).unwrap_err();
        assert_eq!(err.message, "Invalid email format");
    }

    #[test]
    fn test_short_name_after_trim() {
        let err = validate_registration(req(Some("  A  "), Some("a@b.com"), Some("secret1"))).unwrap_err();
        assert_eq!(err.message, "Name must be at least 2 characters");
    }

    #[test]
    fn test_login_requires_both() {
        let err = validate_login(LoginRequest {
            email: Some("a@b.com".into()),
            password: None,
        })
        .unwrap_err();
        assert_eq!(err.message, "Email and password are required");

        let ok = validate_login(LoginRequest {
            email: Some("A@B.com".into()),
            password: Some("x".into()),
        })
        .unwrap();
        assert_eq!(ok.email, "a@b.com");
    }
}
