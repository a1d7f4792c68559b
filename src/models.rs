use crate::config::Config;
use crate::queue::jobs::{JobStatus, JobStore};
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub jobs: JobStore,
    pub queue_tx: mpsc::Sender<Uuid>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Pollable view of one upload job, returned by `GET /api/jobs/{id}`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct JobStatusResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub status: JobStatus,
}
