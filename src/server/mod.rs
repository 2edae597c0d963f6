//! API server carrying the auth-context bridge.
//!
//! The application's real routes live in the web framework out of scope
//! here; this server exposes the bridge itself plus the introspection and
//! health endpoints the bootstrap flow needs.

pub mod auth;
pub mod rls;
pub mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::Request;
use axum::response::Json;
use axum::routing::get;
use axum::{Router, middleware};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;

use session::SessionResolver;

/// Configuration for the API server.
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            dev_mode: false,
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub resolver: Arc<dyn SessionResolver>,
    /// Absent when the server runs without a database (health checks, local
    /// smoke testing); the bridge then only populates request extensions.
    pub pool: Option<PgPool>,
}

pub type SharedState = Arc<AppState>;

/// Build the application router with the auth-context bridge applied.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/me", get(me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_context,
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Who the bridge thinks the caller is. `subject` is null for anonymous
/// requests; the route itself is public.
async fn me(request: Request<Body>) -> Json<serde_json::Value> {
    let subject = auth::identity(request.extensions()).map(|i| i.subject.clone());
    Json(serde_json::json!({ "subject": subject }))
}

/// Start the API server.
pub async fn start_server(config: ServerConfig, resolver: Arc<dyn SessionResolver>) -> Result<()> {
    let pool = match &config.database_url {
        Some(url) => Some(
            PgPoolOptions::new()
                .max_connections(8)
                .connect(url)
                .await
                .context("Failed to connect to database")?,
        ),
        None => {
            tracing::warn!("no DATABASE_URL configured; RLS context will not be set");
            None
        }
    };

    let state = Arc::new(AppState { resolver, pool });
    let mut app = build_router(state);

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
