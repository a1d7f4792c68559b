//! Drive v3 REST client: folder creation and multipart PDF upload.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::config::UploadConfig;
use crate::drive::auth::ServiceAccountAuth;
use crate::types::{AppError, AppResult};
use crate::utils::with_retry;

const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const PDF_MIME_TYPE: &str = "application/pdf";
const MULTIPART_BOUNDARY: &str = "pdf2drive_upload_boundary";

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// Drive file id of the uploaded PDF.
    pub file_id: String,
    /// Browser link, when Drive returns one.
    pub web_view_link: Option<String>,
}

/// Remote storage seam, mockable in tests.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a folder named `folder_name` under `parent_id` (Drive root when
    /// `None`) and upload `bytes` into it as `filename`.
    async fn store_pdf(
        &self,
        folder_name: &str,
        filename: &str,
        bytes: Vec<u8>,
        parent_id: Option<&str>,
    ) -> AppResult<UploadOutcome>;
}

pub struct DriveClient {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    api_base: String,
    max_attempts: u32,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct FileResource {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: Option<String>,
}

impl DriveClient {
    pub fn new(auth: ServiceAccountAuth, upload: &UploadConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            api_base: DEFAULT_API_BASE.to_string(),
            max_attempts: upload.max_retries.max(1),
            retry_delay: Duration::from_secs(upload.retry_delay_secs),
        }
    }

    /// Point the client at a different API host (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Create a Drive folder and return its id.
    pub async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> AppResult<String> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/drive/v3/files", self.api_base);

        let mut metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });
        if let Some(parent) = parent_id {
            metadata["parents"] = serde_json::json!([parent]);
        }

        let created: FileResource = with_retry(
            || async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&token)
                    .query(&[("fields", "id")])
                    .json(&metadata)
                    .send()
                    .await
                    .map_err(|e| AppError::Transient(format!("folder create failed: {e}")))?;
                decode(response).await
            },
            self.max_attempts,
            self.retry_delay,
        )
        .await?;

        info!(folder = name, id = %created.id, "Drive folder created");
        Ok(created.id)
    }

    /// Upload PDF bytes into `folder_id` as `filename`.
    pub async fn upload_pdf(
        &self,
        filename: &str,
        folder_id: &str,
        bytes: &[u8],
    ) -> AppResult<UploadOutcome> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/upload/drive/v3/files", self.api_base);

        let metadata = serde_json::json!({
            "name": filename,
            "parents": [folder_id],
            "mimeType": PDF_MIME_TYPE,
        });
        let body = multipart_related(&metadata, bytes);

        let uploaded: FileResource = with_retry(
            || async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&token)
                    .query(&[("uploadType", "multipart"), ("fields", "id,webViewLink")])
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
                    )
                    .body(body.clone())
                    .send()
                    .await
                    .map_err(|e| AppError::Transient(format!("upload failed: {e}")))?;
                decode(response).await
            },
            self.max_attempts,
            self.retry_delay,
        )
        .await?;

        info!(file = filename, id = %uploaded.id, "PDF uploaded");
        Ok(UploadOutcome {
            file_id: uploaded.id,
            web_view_link: uploaded.web_view_link,
        })
    }
}

#[async_trait]
impl Storage for DriveClient {
    async fn store_pdf(
        &self,
        folder_name: &str,
        filename: &str,
        bytes: Vec<u8>,
        parent_id: Option<&str>,
    ) -> AppResult<UploadOutcome> {
        info!(folder = folder_name, "starting Drive upload flow");
        let folder_id = self.create_folder(folder_name, parent_id).await?;
        self.upload_pdf(filename, &folder_id, &bytes).await
    }
}

/// Classify a Drive response: 401/403 are credential problems, 5xx are worth
/// retrying, other failures are permanent rejections (quota, bad request).
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upload(format!("decode Drive response: {e}")));
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => AppError::Auth(format!("Drive rejected credentials ({status}): {body}")),
        s if s >= 500 => AppError::Transient(format!("Drive server error ({status}): {body}")),
        _ => AppError::Upload(format!("Drive rejected request ({status}): {body}")),
    })
}

/// Assemble a `multipart/related` body: JSON metadata part, then the PDF.
fn multipart_related(metadata: &serde_json::Value, pdf: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(pdf.len() + 512);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: {PDF_MIME_TYPE}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(pdf);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
