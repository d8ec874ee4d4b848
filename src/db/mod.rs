//! Shared Postgres client
//!
//! One [`Database`] is created at startup and shared by every request. The
//! underlying `tokio_postgres::Client` pipelines queries from many tasks over
//! a single connection. Lifecycle: [`Database::connect`] at startup,
//! [`Database::client`] per operation, [`Database::close`] on shutdown.

mod schema;

pub use schema::migrate;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

struct Connection {
    client: Arc<Client>,
    last_ping: Instant,
}

pub struct Database {
    config: DatabaseConfig,
    conn: RwLock<Option<Connection>>,
}

impl Database {
    /// Connect at startup; fails if the database is unreachable
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        let client = open(&config).await?;
        tracing::info!("Connected to database");
        Ok(Self {
            config,
            conn: RwLock::new(Some(Connection {
                client,
                last_ping: Instant::now(),
            })),
        })
    }

    /// Get the live client.
    ///
    /// A `SELECT 1` ping runs only when the ping interval has elapsed since
    /// the last good ping. A failed ping triggers one reconnect; if that
    /// fails too the caller gets `Error::Unavailable`.
    pub async fn client(&self) -> Result<Arc<Client>> {
        {
            let conn = self.conn.read().await;
            if let Some(conn) = conn.as_ref() {
                if !conn.client.is_closed()
                    && conn.last_ping.elapsed() < self.config.ping_interval()
                {
                    return Ok(conn.client.clone());
                }
            }
        }

        let mut conn = self.conn.write().await;

        // Another task may have pinged or reconnected while we waited
        if let Some(current) = conn.as_mut() {
            if !current.client.is_closed() {
                if current.last_ping.elapsed() < self.config.ping_interval() {
                    return Ok(current.client.clone());
                }
                match current.client.simple_query("SELECT 1").await {
                    Ok(_) => {
                        current.last_ping = Instant::now();
                        return Ok(current.client.clone());
                    }
                    Err(e) => tracing::warn!("Database ping failed, reconnecting: {}", e),
                }
            } else {
                tracing::warn!("Database connection closed, reconnecting");
            }
        }

        *conn = None;
        let client = open(&self.config).await.map_err(|e| {
            tracing::error!("Failed to reconnect to database: {}", e);
            Error::Unavailable(e.to_string())
        })?;
        tracing::info!("Reconnected to database");

        *conn = Some(Connection {
            client: client.clone(),
            last_ping: Instant::now(),
        });
        Ok(client)
    }

    /// Run `op`, reconnecting and retrying once if the connection dropped.
    ///
    /// The first attempt may have committed before the connection dropped,
    /// so `op` must be safe to run twice.
    pub async fn with_retry<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(Arc<Client>) -> Fut,
        Fut: Future<Output = std::result::Result<T, tokio_postgres::Error>>,
    {
        let client = self.client().await?;
        match op(client).await {
            Err(e) if e.is_closed() => {
                tracing::warn!("Database connection lost mid-query, retrying once");
                self.invalidate().await;
                let client = self.client().await?;
                op(client).await.map_err(Error::from)
            }
            result => result.map_err(Error::from),
        }
    }

    /// Force the next `client()` call to reconnect
    pub async fn invalidate(&self) {
        *self.conn.write().await = None;
    }

    /// Drop the client, ending the connection task
    pub async fn close(&self) {
        if self.conn.write().await.take().is_some() {
            tracing::info!("Database connection closed");
        }
    }
}

async fn open(config: &DatabaseConfig) -> Result<Arc<Client>> {
    let mut pg_config: tokio_postgres::Config = config
        .url
        .parse()
        .map_err(|e: tokio_postgres::Error| Error::Config(format!("Invalid database url: {}", e)))?;
    pg_config.connect_timeout(config.connect_timeout());

    let (client, connection) = pg_config.connect(NoTls).await?;

    // Spawn the connection handler
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    Ok(Arc::new(client))
}
