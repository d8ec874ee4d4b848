//! JWT token handling
//!
//! One issuer serves both the browser cookie and the mobile bearer header;
//! only the TTL differs, and the transport is chosen by the caller.

use crate::auth::models::User;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email at issue time
    pub email: String,
    /// Display name at issue time
    pub name: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `ttl` from `now`
    pub fn for_user(user: &User, ttl: chrono::Duration, now: i64) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now,
            exp: now + ttl.num_seconds(),
        }
    }

    /// Parse the subject as a user id
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the token is expired at `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Signs and verifies session tokens with the server secret
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    /// Build an issuer; an empty secret is a configuration error
    pub fn new(secret: &str) -> Result<Self> {
        if secret.trim().is_empty() {
            return Err(Error::Config("JWT secret must not be empty".to_string()));
        }

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
        })
    }

    /// Create a token for `user` that expires after `ttl`
    pub fn issue(&self, user: &User, ttl: chrono::Duration) -> Result<String> {
        self.issue_at(user, ttl, chrono::Utc::now().timestamp())
    }

    /// Create a token as if the current time were `now`
    pub fn issue_at(&self, user: &User, ttl: chrono::Duration, now: i64) -> Result<String> {
        let claims = Claims::for_user(user, ttl, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| Error::Token(format!("Failed to create token: {}", e)))
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Validate and decode a token against an explicit clock.
    ///
    /// Signature and structure are checked by `jsonwebtoken`; expiry is
    /// checked here with no leeway so `now >= exp` is always rejected.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Token(format!("Invalid token: {}", e)))?;

        if claims.is_expired_at(now) {
            return Err(Error::Token("Invalid token: expired".to_string()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret").unwrap()
    }

    fn user() -> User {
        User::new("Al".to_string(), "a@b.com".to_string(), String::new())
    }

    #[test]
    fn test_create_and_validate_token() {
        let user = user();
        let token = issuer().issue(&user, chrono::Duration::days(7)).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.name, "Al");
        assert_eq!(claims.user_id(), Some(user.id));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(TokenIssuer::new(""), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_token() {
        assert!(issuer().verify("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue(&user(), chrono::Duration::days(1)).unwrap();
        let other = TokenIssuer::new("another-secret").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expiry_boundary() {
        let ttl = chrono::Duration::seconds(3600);
        let t0 = 1_700_000_000;
        let token = issuer().issue_at(&user(), ttl, t0).unwrap();

        assert!(issuer().verify_at(&token, t0 + 3599).is_ok());
        assert!(issuer().verify_at(&token, t0 + 3600).is_err());
        assert!(issuer().verify_at(&token, t0 + 3601).is_err());
    }

    #[test]
    fn test_ttl_sets_exp() {
        let user = user();
        let claims = Claims::for_user(&user, chrono::Duration::days(30), 100);
        assert_eq!(claims.iat, 100);
        assert_eq!(claims.exp, 100 + 30 * 24 * 60 * 60);
    }
}
