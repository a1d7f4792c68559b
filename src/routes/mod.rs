//! API Routes
//!
//! - `/` - submission form
//! - `/upload` - form POST: validate, render PDF, enqueue upload
//! - `/api/jobs/{id}` - poll an upload job
//! - `/api/health` - health check

pub mod health;
pub mod jobs;
pub mod ui;
pub mod upload;

use crate::models::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(ui::router())
        .merge(upload::router(state.clone()))
        .merge(jobs::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}
