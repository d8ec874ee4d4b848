//! HTTP API server

pub mod auth;
pub mod cors;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod extract;
pub mod links;
pub mod mobile;
pub mod routes;
pub mod server;

pub use server::*;
