//! In-memory fake of the remote store seam.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use urlstash_core::{RemoteKind, RemoteNode, RemoteStore, StoreError, StoreResult};

/// One call observed by the [`RecordingStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// A folder creation request.
    CreateFolder {
        /// Destination path the folder was created under.
        parent: String,
        /// Folder name.
        name: String,
    },
    /// A file upload request.
    UploadFile {
        /// Destination path the file was uploaded under.
        parent: String,
        /// File name.
        name: String,
        /// Uploaded content.
        content: String,
    },
}

/// Recording fake for the [`RemoteStore`] trait.
///
/// Folder creation answers with a deterministic remote id
/// (`<provider>/<name>`) so tests can assert child routing; individual
/// folders and uploads can be armed to fail.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    failing_folders: Mutex<HashSet<String>>,
    failing_uploads: Mutex<HashSet<String>>,
    upload_delay: Option<Duration>,
}

impl RecordingStore {
    /// Construct an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload pause first, to open a cancellation window.
    #[must_use]
    pub const fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    /// Arm folder creation for `name` to fail with a conflict status.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_folder(&self, name: &str) {
        self.failing_folders
            .lock()
            .expect("failing_folders mutex poisoned")
            .insert(name.to_string());
    }

    /// Arm uploads of `name` to fail with a server error status.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_upload(&self, name: &str) {
        self.failing_uploads
            .lock()
            .expect("failing_uploads mutex poisoned")
            .insert(name.to_string());
    }

    /// Snapshot of the observed calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }

    fn provider_of(parent: &str) -> String {
        parent.split('/').next().unwrap_or(parent).to_string()
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    async fn create_folder(&self, parent: &str, name: &str) -> StoreResult<RemoteNode> {
        self.record(StoreCall::CreateFolder {
            parent: parent.to_string(),
            name: name.to_string(),
        });
        if self
            .failing_folders
            .lock()
            .expect("failing_folders mutex poisoned")
            .contains(name)
        {
            return Err(StoreError::UnexpectedStatus {
                operation: "create_folder",
                status: 409,
            });
        }
        Ok(RemoteNode {
            kind: RemoteKind::Folder,
            remote_id: format!("{}/{name}", Self::provider_of(parent)),
        })
    }

    async fn upload_file(&self, parent: &str, name: &str, local: &Path) -> StoreResult<()> {
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        let content = tokio::fs::read_to_string(local)
            .await
            .map_err(|source| StoreError::Request {
                operation: "upload_file",
                source: Box::new(source),
            })?;
        self.record(StoreCall::UploadFile {
            parent: parent.to_string(),
            name: name.to_string(),
            content,
        });
        if self
            .failing_uploads
            .lock()
            .expect("failing_uploads mutex poisoned")
            .contains(name)
        {
            return Err(StoreError::UnexpectedStatus {
                operation: "upload_file",
                status: 500,
            });
        }
        Ok(())
    }
}
