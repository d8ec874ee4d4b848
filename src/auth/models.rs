//! Authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user record
///
/// Carries the password hash, so it is deliberately not `Serialize`. Use
/// [`UserSummary`] or [`UserProfile`] for anything sent to a client.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user identifier, the only key resources are owned by
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Login email, trimmed and lowercased
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last name or password change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim and lowercase an email so lookups and uniqueness are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration payload; every field optional so missing ones can be reported
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login credentials
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Minimal user projection returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full user projection for profile and token verification responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_profile_omits_password() {
        let user = User::new("Al".into(), "a@b.com".into(), "$2b$04$hash".into());
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_user_id_uniqueness() {
        let a = User::new("A".into(), "a@b.com".into(), String::new());
        let b = User::new("A".into(), "a@b.com".into(), String::new());
        assert_ne!(a.id, b.id);
    }
}
