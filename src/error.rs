//! Error types for docsave

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Config file not found. Run 'docsave init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Hash(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Token(err.to_string())
    }
}

impl Error {
    /// Whether the error came from losing the storage connection
    pub fn is_connection_lost(&self) -> bool {
        match self {
            Error::Unavailable(_) => true,
            Error::Database(e) => e.is_closed(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
