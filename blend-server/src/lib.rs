//! blend-server library - Persistence Service for coal blend records
//!
//! Three blend routes over a single SQLite-backed collection, plus health
//! and build info. The service holds no in-process mutable state; every
//! request goes straight to the record store.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let blend = Router::new()
        .route("/api/blend", post(api::create_blend))
        .route("/api/blend/latest", get(api::get_latest_blend))
        .route("/api/blend/:id", put(api::update_blend));

    Router::new()
        .merge(blend)
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
