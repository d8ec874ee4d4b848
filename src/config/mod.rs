//! Configuration management for docsave

pub mod loader;
mod schema;

pub use loader::{load_config, load_config_from_path, write_default_config};
pub use schema::*;
