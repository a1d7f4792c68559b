// Error types shared across the crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Upload error: {0}")]
    Upload(String),

    /// Remote failure worth retrying (5xx, connection errors, timeouts).
    #[error("Upload error (transient): {0}")]
    Transient(String),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Auth(_) | AppError::Upload(_) | AppError::Transient(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Pdf(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(AppError::Transient("socket closed".into()).is_transient());
        assert!(!AppError::Upload("quota exceeded".into()).is_transient());
        assert!(!AppError::Auth("key not shared".into()).is_transient());
    }

    #[test]
    fn status_mapping() {
        let resp = AppError::Validation("title".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = AppError::NotFound("job".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Auth("denied".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
