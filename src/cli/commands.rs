//! CLI command implementations

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::{error, field, info, redact_url, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::db::{self, Database};

/// Initialize a new docsave.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    config::write_default_config(config_path)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set JWT_SECRET and DATABASE_URL, then run 'docsave migrate' and 'docsave serve'");

    Ok(())
}

/// Validate the config and ping the database
pub async fn check(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    if let Err(e) = config.validate() {
        error(&format!("Invalid configuration: {}", e));
        return Err(e.into());
    }
    success("Configuration is valid");
    field("Listen", format!("{}:{}", config.server.host, config.server.port));
    field("Database", redact_url(&config.database.url));
    field("Allowed origins", config.cors.allowed_origins.join(", "));

    match Database::connect(config.database.clone()).await {
        Ok(db) => {
            db.close().await;
            success("Database is reachable");
            Ok(())
        }
        Err(e) => {
            error(&format!("Database check failed: {}", e));
            Err(e.into())
        }
    }
}

/// Apply the schema to the configured database
pub async fn migrate(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;

    let db = Database::connect(config.database.clone()).await?;
    let result = db::migrate(&db).await;
    db.close().await;

    match result {
        Ok(()) => {
            success("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            error(&format!("Migration failed: {}", e));
            Err(e.into())
        }
    }
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    config.map_err(|e| anyhow::anyhow!("{}", e))
}
