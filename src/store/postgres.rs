//! PostgreSQL store

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use uuid::Uuid;

use super::models::{Document, DocumentKind, Link, LinkUpdate};
use super::{DocumentStore, LinkStore, UserStore};
use crate::auth::models::User;
use crate::db::Database;
use crate::error::{Error, Result};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const DOCUMENT_COLUMNS: &str = "id, owner_id, title, kind, content, file_url, file_type, \
                                file_size, link, tags, created_at, updated_at";
const LINK_COLUMNS: &str = "id, owner_id, title, url, description, category, created_at, updated_at";

pub struct PostgresStore {
    db: Arc<Database>,
}

impl PostgresStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn user_from_row(row: &Row) -> std::result::Result<User, tokio_postgres::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn document_from_row(row: &Row) -> Result<Document> {
    let kind: String = row.try_get("kind")?;
    Ok(Document {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        kind: kind.parse::<DocumentKind>().map_err(Error::Other)?,
        content: row.try_get("content")?,
        file_url: row.try_get("file_url")?,
        file_type: row.try_get("file_type")?,
        file_size: row.try_get("file_size")?,
        link: row.try_get("link")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn link_from_row(row: &Row) -> std::result::Result<Link, tokio_postgres::Error> {
    Ok(Link {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        url: row.try_get("url")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query_opt(sql, &[&email]).await }
            })
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query_opt(sql, &[&id]).await }
            })
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let row = self
            .db
            .with_retry(|client| async move {
                client
                    .query_one(
                        "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))",
                        &[&email],
                    )
                    .await
            })
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let result = self
            .db
            .with_retry(|client| async move {
                client
                    .execute(
                        "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
                         VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (id) DO NOTHING",
                        &[
                            &user.id,
                            &user.name,
                            &user.email,
                            &user.password_hash,
                            &user.created_at,
                            &user.updated_at,
                        ],
                    )
                    .await
            })
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(Error::Database(e)) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(Error::EmailTaken)
            }
            Err(e) => Err(e),
        }
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET name = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let now = Utc::now();
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query_opt(sql, &[&id, &name, &now]).await }
            })
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let now = Utc::now();
        let updated = self
            .db
            .with_retry(|client| async move {
                client
                    .execute(
                        "UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1",
                        &[&id, &password_hash, &now],
                    )
                    .await
            })
            .await?;
        Ok(updated > 0)
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Document>> {
        let sql = format!(
            "SELECT {} FROM documents WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2",
            DOCUMENT_COLUMNS
        );
        let rows = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query(sql, &[&owner, &limit]).await }
            })
            .await?;
        rows.iter().map(document_from_row).collect()
    }

    async fn count(&self, owner: Uuid) -> Result<i64> {
        let row = self
            .db
            .with_retry(|client| async move {
                client
                    .query_one("SELECT COUNT(*) FROM documents WHERE owner_id = $1", &[&owner])
                    .await
            })
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>> {
        let sql = format!(
            "SELECT {} FROM documents WHERE id = $1 AND owner_id = $2",
            DOCUMENT_COLUMNS
        );
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query_opt(sql, &[&id, &owner]).await }
            })
            .await?;
        row.as_ref().map(document_from_row).transpose()
    }

    async fn insert(&self, document: &Document) -> Result<()> {
        let kind = document.kind.to_string();
        let kind = kind.as_str();
        self.db
            .with_retry(|client| async move {
                client
                    .execute(
                        "INSERT INTO documents (id, owner_id, title, kind, content, file_url, \
                         file_type, file_size, link, tags, created_at, updated_at) \
                         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
                         ON CONFLICT (id) DO NOTHING",
                        &[
                            &document.id,
                            &document.owner_id,
                            &document.title,
                            &kind,
                            &document.content,
                            &document.file_url,
                            &document.file_type,
                            &document.file_size,
                            &document.link,
                            &document.tags,
                            &document.created_at,
                            &document.updated_at,
                        ],
                    )
                    .await
            })
            .await?;
        Ok(())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let deleted = self
            .db
            .with_retry(|client| async move {
                client
                    .execute(
                        "DELETE FROM documents WHERE id = $1 AND owner_id = $2",
                        &[&id, &owner],
                    )
                    .await
            })
            .await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl LinkStore for PostgresStore {
    async fn list(&self, owner: Uuid, limit: Option<i64>) -> Result<Vec<Link>> {
        let sql = format!(
            "SELECT {} FROM links WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2",
            LINK_COLUMNS
        );
        let rows = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query(sql, &[&owner, &limit]).await }
            })
            .await?;
        Ok(rows.iter().map(link_from_row).collect::<std::result::Result<_, _>>()?)
    }

    async fn count(&self, owner: Uuid) -> Result<i64> {
        let row = self
            .db
            .with_retry(|client| async move {
                client
                    .query_one("SELECT COUNT(*) FROM links WHERE owner_id = $1", &[&owner])
                    .await
            })
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Link>> {
        let sql = format!("SELECT {} FROM links WHERE id = $1 AND owner_id = $2", LINK_COLUMNS);
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move { client.query_opt(sql, &[&id, &owner]).await }
            })
            .await?;
        Ok(row.as_ref().map(link_from_row).transpose()?)
    }

    async fn insert(&self, link: &Link) -> Result<()> {
        self.db
            .with_retry(|client| async move {
                client
                    .execute(
                        "INSERT INTO links (id, owner_id, title, url, description, category, \
                         created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                         ON CONFLICT (id) DO NOTHING",
                        &[
                            &link.id,
                            &link.owner_id,
                            &link.title,
                            &link.url,
                            &link.description,
                            &link.category,
                            &link.created_at,
                            &link.updated_at,
                        ],
                    )
                    .await
            })
            .await?;
        Ok(())
    }

    async fn update(&self, owner: Uuid, id: Uuid, update: &LinkUpdate) -> Result<Option<Link>> {
        let sql = format!(
            "UPDATE links SET title = $3, url = $4, updated_at = $5 \
             WHERE id = $1 AND owner_id = $2 RETURNING {}",
            LINK_COLUMNS
        );
        let now = Utc::now();
        let row = self
            .db
            .with_retry(|client| {
                let sql = sql.as_str();
                async move {
                    client
                        .query_opt(sql, &[&id, &owner, &update.title, &update.url, &now])
                        .await
                }
            })
            .await?;
        Ok(row.as_ref().map(link_from_row).transpose()?)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let deleted = self
            .db
            .with_retry(|client| async move {
                client
                    .execute("DELETE FROM links WHERE id = $1 AND owner_id = $2", &[&id, &owner])
                    .await
            })
            .await?;
        Ok(deleted > 0)
    }
}
