use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::models::{AppState, JobStatusResponse};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs/{id}", get(job_status))
        .with_state(state)
}

async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobStatusResponse>> {
    let (title, status) = state
        .jobs
        .status(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;

    Ok(Json(JobStatusResponse { id, title, status }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DriveConfig, ServerConfig, UploadConfig};
    use crate::queue::jobs::{JobStatus, JobStore, UploadJob};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let (queue_tx, _queue_rx) = mpsc::channel(1);
        AppState {
            config: Config {
                server: ServerConfig {
                    port: 0,
                    host: "127.0.0.1".into(),
                },
                drive: DriveConfig {
                    credentials_path: "/dev/null".into(),
                    parent_folder_id: None,
                },
                upload: UploadConfig {
                    max_retries: 3,
                    retry_delay_secs: 0,
                },
            },
            jobs: JobStore::new(),
            queue_tx,
        }
    }

    #[tokio::test]
    async fn unknown_job_is_404() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::get(format!("/api/jobs/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn completed_job_exposes_the_file_id() {
        let state = test_state();
        let id = state
            .jobs
            .insert(UploadJob::new("Report", "Report.pdf", vec![1]))
            .await;
        state
            .jobs
            .set_status(
                id,
                JobStatus::Completed {
                    file_id: "file-789".into(),
                    web_view_link: Some("https://drive.google.com/file/d/file-789".into()),
                },
            )
            .await;

        let app = router(state);
        let response = app
            .oneshot(
                Request::get(format!("/api/jobs/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["state"], "completed");
        assert_eq!(parsed["file_id"], "file-789");
        assert_eq!(parsed["title"], "Report");
    }
}
