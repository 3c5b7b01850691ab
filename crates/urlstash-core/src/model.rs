//! Typed carriers shared between the job pipeline and the remote store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Destination path used when the submitter does not pick a folder.
pub const DEFAULT_DESTINATION: &str = "osfstorage/";

/// Validated download submission, immutable once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Sanitized source URL handed to the retrieval tool.
    pub url: String,
    /// Whether the retrieval tool should follow links recursively.
    pub recursive: bool,
    /// Whether a wait interval is inserted between fetches.
    pub use_interval: bool,
    /// Interval value forwarded verbatim to the retrieval tool.
    pub interval_seconds: String,
    /// Remote store project the tree is mirrored into.
    pub destination_project_id: String,
    /// `/`-delimited destination folder inside the project, when chosen.
    pub destination_folder_id: Option<String>,
}

impl DownloadRequest {
    /// Destination path for the mirror root, falling back to the default
    /// provider root when no folder was picked.
    #[must_use]
    pub fn destination_path(&self) -> &str {
        self.destination_folder_id
            .as_deref()
            .unwrap_or(DEFAULT_DESTINATION)
    }
}

/// Lifecycle of one download-then-mirror job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted but not yet picked up by the executor.
    Pending,
    /// Pipeline is executing.
    Running,
    /// All pipeline steps completed.
    Succeeded,
    /// A pipeline step failed; cleanup already ran.
    Failed {
        /// Human-readable failure detail.
        message: String,
    },
    /// Job was cancelled; cleanup already ran.
    Cancelled,
}

impl JobStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed { .. } | Self::Cancelled
        )
    }

    /// Machine-friendly discriminator for logs and events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Node kinds reported by the remote store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// Regular file entry.
    File,
    /// Folder entry that can hold children.
    Folder,
}

/// Node handle returned by the remote store on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteNode {
    /// Kind of the created node.
    pub kind: RemoteKind,
    /// `/`-delimited identifier routing children to this node.
    pub remote_id: String,
}

/// Descriptor for a tracked job, surfaced by the registry.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptor {
    /// Unique job identifier.
    pub id: Uuid,
    /// Current lifecycle state.
    pub status: JobStatus,
}
