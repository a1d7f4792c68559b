use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::drive::Storage;
use crate::queue::jobs::{JobStatus, JobStore};

/// Drains the job channel and drives each upload through the storage
/// backend. One worker per process; jobs are processed in order.
pub struct Worker {
    store: JobStore,
    storage: Arc<dyn Storage>,
    parent_folder_id: Option<String>,
}

impl Worker {
    pub fn new(store: JobStore, storage: Arc<dyn Storage>, parent_folder_id: Option<String>) -> Self {
        Self {
            store,
            storage,
            parent_folder_id,
        }
    }

    pub fn spawn(self, rx: mpsc::Receiver<Uuid>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: mpsc::Receiver<Uuid>) {
        info!("upload worker started");
        while let Some(id) = rx.recv().await {
            self.process(id).await;
        }
        // All senders dropped, nothing more to do.
        info!("upload worker stopped");
    }

    pub async fn process(&self, id: Uuid) {
        let Some((title, filename)) = self.store.meta(id).await else {
            warn!(%id, "job vanished before processing");
            return;
        };
        let Some(bytes) = self.store.take_bytes(id).await else {
            error!(%id, "job has no payload");
            self.store
                .set_status(
                    id,
                    JobStatus::Failed {
                        error: "job payload missing".into(),
                    },
                )
                .await;
            return;
        };

        self.store.set_status(id, JobStatus::Uploading).await;
        info!(%id, %title, "uploading PDF to Drive");

        match self
            .storage
            .store_pdf(&title, &filename, bytes, self.parent_folder_id.as_deref())
            .await
        {
            Ok(outcome) => {
                info!(%id, file_id = %outcome.file_id, "upload completed");
                self.store
                    .set_status(
                        id,
                        JobStatus::Completed {
                            file_id: outcome.file_id,
                            web_view_link: outcome.web_view_link,
                        },
                    )
                    .await;
            }
            Err(e) => {
                error!(%id, error = %e, "upload failed");
                self.store
                    .set_status(
                        id,
                        JobStatus::Failed {
                            error: e.to_string(),
                        },
                    )
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{Storage, UploadOutcome};
    use crate::queue::jobs::UploadJob;
    use crate::types::{AppError, AppResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        folder_name: String,
        filename: String,
        parent_id: Option<String>,
    }

    struct MockStorage {
        calls: Mutex<Vec<RecordedCall>>,
        deny_access: bool,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                deny_access: false,
            }
        }

        fn denying_access() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                deny_access: true,
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Storage for MockStorage {
        async fn store_pdf(
            &self,
            folder_name: &str,
            filename: &str,
            _bytes: Vec<u8>,
            parent_id: Option<&str>,
        ) -> AppResult<UploadOutcome> {
            self.calls.lock().unwrap().push(RecordedCall {
                folder_name: folder_name.to_string(),
                filename: filename.to_string(),
                parent_id: parent_id.map(String::from),
            });
            if self.deny_access {
                return Err(AppError::Auth("folder not shared".into()));
            }
            Ok(UploadOutcome {
                file_id: format!("file-{}", self.calls.lock().unwrap().len()),
                web_view_link: None,
            })
        }
    }

    #[tokio::test]
    async fn processes_a_job_to_completion() {
        let store = JobStore::new();
        let storage = Arc::new(MockStorage::new());
        let worker = Worker::new(store.clone(), storage.clone(), Some("parent-1".into()));

        let id = store
            .insert(UploadJob::new(
                "Invoice 2024-01",
                "Invoice_2024-01.pdf",
                b"%PDF-1.5".to_vec(),
            ))
            .await;
        worker.process(id).await;

        let (_, status) = store.status(id).await.unwrap();
        assert!(
            matches!(status, JobStatus::Completed { ref file_id, .. } if file_id == "file-1"),
            "got {status:?}"
        );
        assert!(!store.has_payload(id).await);

        let calls = storage.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].folder_name, "Invoice 2024-01");
        assert_eq!(calls[0].filename, "Invoice_2024-01.pdf");
        assert_eq!(calls[0].parent_id.as_deref(), Some("parent-1"));
    }

    #[tokio::test]
    async fn denied_access_fails_the_job_and_drops_the_payload() {
        let store = JobStore::new();
        let storage = Arc::new(MockStorage::denying_access());
        let worker = Worker::new(store.clone(), storage.clone(), None);

        let id = store
            .insert(UploadJob::new("Report", "Report.pdf", b"%PDF-1.5".to_vec()))
            .await;
        worker.process(id).await;

        let (_, status) = store.status(id).await.unwrap();
        assert!(
            matches!(status, JobStatus::Failed { ref error } if error.contains("folder not shared")),
            "got {status:?}"
        );
        assert!(!store.has_payload(id).await);
    }

    #[tokio::test]
    async fn duplicate_titles_upload_twice() {
        let store = JobStore::new();
        let storage = Arc::new(MockStorage::new());
        let worker = Worker::new(store.clone(), storage.clone(), None);

        let first = store
            .insert(UploadJob::new("Same", "Same.pdf", b"%PDF-1".to_vec()))
            .await;
        let second = store
            .insert(UploadJob::new("Same", "Same.pdf", b"%PDF-1".to_vec()))
            .await;
        worker.process(first).await;
        worker.process(second).await;

        // No dedup: two submissions mean two remote files.
        assert_eq!(storage.calls().len(), 2);
        let (_, first_status) = store.status(first).await.unwrap();
        let (_, second_status) = store.status(second).await.unwrap();
        assert_ne!(first, second);
        assert!(first_status.is_terminal() && second_status.is_terminal());
    }

    #[tokio::test]
    async fn worker_loop_drains_the_channel() {
        let store = JobStore::new();
        let storage = Arc::new(MockStorage::new());
        let worker = Worker::new(store.clone(), storage.clone(), None);

        let (tx, rx) = mpsc::channel(4);
        let handle = worker.spawn(rx);

        let id = store
            .insert(UploadJob::new("Queued", "Queued.pdf", b"%PDF-1".to_vec()))
            .await;
        tx.send(id).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let (_, status) = store.status(id).await.unwrap();
        assert!(matches!(status, JobStatus::Completed { .. }));
    }
}
