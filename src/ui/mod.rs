//! Server-rendered pages

mod handlers;

pub use handlers::*;
