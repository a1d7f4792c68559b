//! Form submission handler: validate the title, render the PDF, enqueue the
//! upload job. The Drive round-trip itself happens on the worker, so the
//! response never blocks on the remote service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::models::AppState;
use crate::pdf;
use crate::queue::jobs::UploadJob;
use crate::routes::ui;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(submit))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    title: Option<String>,
}

async fn submit(State(state): State<AppState>, Form(form): Form<UploadForm>) -> Response {
    let title = form.title.unwrap_or_default();
    let title = title.trim();

    // Reject before any PDF work or network traffic happens.
    if title.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(ui::render_form(Some("Title must not be empty."))),
        )
            .into_response();
    }

    let bytes = match pdf::render_title_page(title) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "PDF generation failed");
            return e.into_response();
        }
    };

    let job = UploadJob::new(title, pdf::filename_for(title), bytes);
    let id = state.jobs.insert(job).await;

    if state.queue_tx.send(id).await.is_err() {
        error!(%id, "upload queue is gone");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(ui::render_form(Some(
                "Upload queue unavailable, try again later.",
            ))),
        )
            .into_response();
    }

    info!(%id, title, "upload job queued");
    Html(ui::render_confirmation(id, title)).into_response()
}
