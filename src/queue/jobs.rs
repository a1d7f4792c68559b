use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Uploading,
    Completed {
        file_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        web_view_link: Option<String>,
    },
    Failed {
        error: String,
    },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

/// One generate-and-store operation. The PDF bytes live here only until the
/// job reaches a terminal state; nothing is ever written to local disk.
#[derive(Debug)]
pub struct UploadJob {
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub bytes: Option<Vec<u8>>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl UploadJob {
    pub fn new(title: impl Into<String>, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            filename: filename.into(),
            bytes: Some(bytes),
            status: JobStatus::Queued,
            created_at: Utc::now(),
        }
    }
}

/// In-memory job registry shared between handlers and the worker. Jobs are
/// never persisted; a restart forgets them.
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<HashMap<Uuid, UploadJob>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, job: UploadJob) -> Uuid {
        let id = job.id;
        self.inner.write().await.insert(id, job);
        id
    }

    /// Title and current status, for the poll endpoint.
    pub async fn status(&self, id: Uuid) -> Option<(String, JobStatus)> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|job| (job.title.clone(), job.status.clone()))
    }

    /// Title and remote filename, for the worker.
    pub async fn meta(&self, id: Uuid) -> Option<(String, String)> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|job| (job.title.clone(), job.filename.clone()))
    }

    /// Remove and return the PDF payload.
    pub async fn take_bytes(&self, id: Uuid) -> Option<Vec<u8>> {
        self.inner
            .write()
            .await
            .get_mut(&id)
            .and_then(|job| job.bytes.take())
    }

    /// Update a job's status, dropping any leftover payload once terminal.
    pub async fn set_status(&self, id: Uuid, status: JobStatus) {
        if let Some(job) = self.inner.write().await.get_mut(&id) {
            if status.is_terminal() {
                job.bytes = None;
            }
            job.status = status;
        }
    }

    /// Whether the PDF payload is still held for this job.
    pub async fn has_payload(&self, id: Uuid) -> bool {
        self.inner
            .read()
            .await
            .get(&id)
            .is_some_and(|job| job.bytes.is_some())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
