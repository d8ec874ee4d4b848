//! Password hashing

use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::{Error, Result};

/// bcrypt hasher with a fixed cost
///
/// Hashing is CPU bound, so both directions run on the blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| Error::Hash(e.to_string()))?
            .map_err(Error::from)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A wrong password is `Ok(false)`; only a malformed hash is an error.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| Error::Hash(e.to_string()))?
            .map_err(Error::from)
    }

    /// Spend one verification on a throwaway hash.
    ///
    /// Called when a login names an unknown email so the response takes as
    /// long as a wrong password would.
    pub async fn verify_dummy(&self, plaintext: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash("docsave-dummy-password"))
            .await;

        match dummy {
            Ok(hash) => {
                let _ = self.verify(plaintext, hash).await;
            }
            Err(e) => tracing::warn!("Failed to prepare dummy hash: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("secret1").await.unwrap();
        assert_ne!(hash, "secret1");
        assert!(hasher.verify("secret1", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_is_false_not_error() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("secret1").await.unwrap();
        assert!(!hasher.verify("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(4);
        let a = hasher.hash("secret1").await.unwrap();
        let b = hasher.hash("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error() {
        let hasher = PasswordHasher::new(4);
        assert!(hasher.verify("secret1", "not-a-hash").await.is_err());
    }

    #[tokio::test]
    async fn test_verify_dummy_does_not_panic() {
        let hasher = PasswordHasher::new(4);
        hasher.verify_dummy("whatever").await;
        hasher.verify_dummy("again").await;
    }
}
