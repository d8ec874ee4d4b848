//! DocSave - documents and links behind web and mobile sign-in
//!
//! This is the library interface for DocSave: configuration, storage, the
//! token and session layer, and the HTTP router.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod store;
pub mod ui;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::Error;
pub use store::Store;
