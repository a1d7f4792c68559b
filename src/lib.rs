// pdf2drive - Render a titled PDF from a web form and ship it to Google Drive

pub mod config;
pub mod drive;
pub mod models;
pub mod pdf;
pub mod queue;
pub mod routes;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
