//! Owner-scoped storage
//!
//! Every document and link operation takes the owner's user id and only ever
//! sees that owner's rows. A record owned by someone else is
//! indistinguishable from one that does not exist.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::models::User;
use crate::db::Database;
use crate::error::Result;

pub use memory::MemoryStore;
pub use models::{Document, DocumentKind, Link, LinkUpdate, NewDocument, NewLink};
pub use postgres::PostgresStore;

/// User records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Fast-path uniqueness check; `insert` is the real enforcement point
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Insert a user, failing with `Error::EmailTaken` on a duplicate email.
    /// Re-inserting the same id is a no-op, so a replayed insert succeeds.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>>;

    /// Replace the password hash; false if the user does not exist
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;
}

/// Documents, newest first
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Document>>;

    async fn count(&self, owner: Uuid) -> Result<i64>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>>;

    /// Insert; a second insert with the same id is a no-op
    async fn insert(&self, document: &Document) -> Result<()>;

    /// Delete; false if absent or not owned by `owner`
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool>;
}

/// Bookmarked links, newest first
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Link>>;

    async fn count(&self, owner: Uuid) -> Result<i64>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Link>>;

    /// Insert; a second insert with the same id is a no-op
    async fn insert(&self, link: &Link) -> Result<()>;

    async fn update(&self, owner: Uuid, id: Uuid, update: &LinkUpdate) -> Result<Option<Link>>;

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool>;
}

/// Handles to every collection, cheap to clone
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub links: Arc<dyn LinkStore>,
}

impl Store {
    /// Postgres-backed store sharing one database handle
    pub fn postgres(db: Arc<Database>) -> Self {
        let store = Arc::new(PostgresStore::new(db));
        Self {
            users: store.clone(),
            documents: store.clone(),
            links: store,
        }
    }

    /// In-process store, used by tests and local experiments
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            documents: store.clone(),
            links: store,
        }
    }
}
