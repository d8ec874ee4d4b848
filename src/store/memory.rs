//! In-memory store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Document, Link, LinkUpdate};
use super::{DocumentStore, LinkStore, UserStore};
use crate::auth::models::User;
use crate::error::{Error, Result};

/// Store backed by in-process maps
///
/// Email uniqueness is checked and the user inserted under one write lock,
/// so concurrent registrations cannot both succeed.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    documents: RwLock<HashMap<Uuid, Document>>,
    links: RwLock<HashMap<Uuid, Link>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn newest_first<T, F>(mut items: Vec<T>, created: F, limit: Option<i64>) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created(item)));
    if let Some(limit) = limit {
        items.truncate(limit.max(0) as usize);
    }
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Ok(());
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(Error::EmailTaken);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.name = name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Document>> {
        let docs = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| d.owner_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(docs, |d: &Document| d.created_at, limit))
    }

    async fn count(&self, owner: Uuid) -> Result<i64> {
        Ok(self
            .documents
            .read()
            .await
            .values()
            .filter(|d| d.owner_id == owner)
            .count() as i64)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&id)
            .filter(|d| d.owner_id == owner)
            .cloned())
    }

    async fn insert(&self, document: &Document) -> Result<()> {
        self.documents
            .write()
            .await
            .entry(document.id)
            .or_insert_with(|| document.clone());
        Ok(())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut documents = self.documents.write().await;
        if documents.get(&id).is_some_and(|d| d.owner_id == owner) {
            documents.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Link>> {
        let links = self
            .links
            .read()
            .await
            .values()
            .filter(|l| l.owner_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(links, |l: &Link| l.created_at, limit))
    }

    async fn count(&self, owner: Uuid) -> Result<i64> {
        Ok(self
            .links
            .read()
            .await
            .values()
            .filter(|l| l.owner_id == owner)
            .count() as i64)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Link>> {
        Ok(self
            .links
            .read()
            .await
            .get(&id)
            .filter(|l| l.owner_id == owner)
            .cloned())
    }

    async fn insert(&self, link: &Link) -> Result<()> {
        self.links
            .write()
            .await
            .entry(link.id)
            .or_insert_with(|| link.clone());
        Ok(())
    }

    async fn update(&self, owner: Uuid, id: Uuid, update: &LinkUpdate) -> Result<Option<Link>> {
        let mut links = self.links.write().await;
        Ok(links
            .get_mut(&id)
            .filter(|l| l.owner_id == owner)
            .map(|link| {
                link.title = update.title.clone();
                link.url = update.url.clone();
                link.updated_at = Utc::now();
                link.clone()
            }))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut links = self.links.write().await;
        if links.get(&id).is_some_and(|l| l.owner_id == owner) {
            links.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}
