//! Per-job scratch workspace lifecycle.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{JobError, JobResult};

/// Subdirectory of the scratch root that holds all workspaces.
const SCRATCH_SUBDIR: &str = "urlstash";

/// Exclusive scratch directory owned by one job for its lifetime.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Absolute or root-relative directory path.
    pub path: PathBuf,
    /// Identifier of the owning session.
    pub owner_id: String,
}

/// Creates and destroys per-job scratch directories.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    /// Construct a manager rooted at `scratch_root/urlstash`.
    #[must_use]
    pub fn new(scratch_root: &Path) -> Self {
        Self {
            root: scratch_root.join(SCRATCH_SUBDIR),
        }
    }

    /// Allocate a fresh workspace for `owner_id`.
    ///
    /// The scratch root is created idempotently; the workspace name pairs
    /// the owner prefix with a v4 uuid, so names never collide.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceCreate` if any directory cannot be created. This
    /// is fatal for the job; there is no retry.
    pub fn create(&self, owner_id: &str) -> JobResult<Workspace> {
        fs::create_dir_all(&self.root).map_err(|source| JobError::WorkspaceCreate {
            path: self.root.clone(),
            source,
        })?;

        let name = format!("{}_{}", path_safe(owner_id), Uuid::new_v4());
        let path = self.root.join(name);
        fs::create_dir(&path).map_err(|source| JobError::WorkspaceCreate {
            path: path.clone(),
            source,
        })?;

        Ok(Workspace {
            path,
            owner_id: owner_id.to_string(),
        })
    }

    /// Recursively delete the workspace directory tree.
    ///
    /// Destroying an already-absent workspace is a no-op, so the cleanup
    /// path can run unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceDestroy` if the existing tree cannot be removed.
    pub fn destroy(&self, workspace: &Workspace) -> JobResult<()> {
        if !workspace.path.is_dir() {
            return Ok(());
        }
        fs::remove_dir_all(&workspace.path).map_err(|source| JobError::WorkspaceDestroy {
            path: workspace.path.clone(),
            source,
        })
    }
}

/// Session identifiers come from cookies; keep only characters that are
/// safe inside a single path component.
fn path_safe(owner_id: &str) -> String {
    owner_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '-'
            }
        })
        .collect()
}
