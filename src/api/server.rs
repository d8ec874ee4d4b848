//! HTTP API server

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{gatekeeper, PasswordHasher, TokenIssuer};
use crate::config::Config;
use crate::db::{self, Database};
use crate::error::Result;
use crate::store::Store;

use super::cors::CorsPolicy;
use super::{auth, dashboard, documents, links, mobile, routes};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
    pub cors: CorsPolicy,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state from a validated config; refuses to build without a secret
    pub fn new(config: Config, store: Store) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokens: TokenIssuer::new(&config.auth.jwt_secret)?,
            passwords: PasswordHasher::new(config.auth.bcrypt_cost),
            cors: CorsPolicy::new(&config.cors),
            config,
            store,
        })
    }

    /// Whether session cookies get the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.server.production
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    config.validate()?;

    let db = Arc::new(Database::connect(config.database.clone()).await?);
    db::migrate(&db).await?;

    let state = Arc::new(AppState::new(config, Store::postgres(db.clone()))?);
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return std::future::pending().await;
    }
    tracing::info!("Shutting down");
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // API routes
        .route("/api/health", get(routes::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route("/api/auth/password", put(auth::change_password))
        .route(
            "/api/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/api/documents/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/api/links", get(links::list_links).post(links::create_link))
        .route(
            "/api/links/{id}",
            get(links::get_link)
                .put(links::update_link)
                .delete(links::delete_link),
        )
        .route("/api/dashboard", get(dashboard::summary))
        // Mobile routes
        .route("/api/mobile/auth/register", post(mobile::register))
        .route("/api/mobile/auth/login", post(mobile::login))
        .route("/api/mobile/auth/verify", get(mobile::verify))
        .route(
            "/api/mobile/documents",
            get(mobile::list_documents).post(mobile::create_document),
        )
        // UI routes
        .route("/", get(crate::ui::index))
        .route("/login", get(crate::ui::login_page))
        .route("/register", get(crate::ui::register_page))
        .route("/dashboard", get(crate::ui::dashboard))
        .fallback(routes::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
