//! Recursive tree-to-store replication.
//!
//! Walks the immediate children of a local directory in listing order and
//! replays the structure into the remote store: folders are created before
//! their contents, and a subtree is entered only once the store confirmed
//! its folder. Per-item failures are absorbed here; the original system
//! never propagated them, and the mirror reports success once the
//! traversal completes. Only failure to list the root is fatal.

use std::fs::{self, ReadDir};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::warn;
use urlstash_core::{RemoteStore, StoreError, StoreResult};

/// Replay the tree rooted at `local` into the store under `remote_parent`.
///
/// # Errors
///
/// Returns an error only when `local` itself cannot be listed; failures on
/// individual folders or files are logged and skipped.
pub async fn mirror(
    store: &dyn RemoteStore,
    local: &Path,
    remote_parent: &str,
) -> StoreResult<()> {
    let entries = fs::read_dir(local).map_err(|source| StoreError::ListRoot {
        path: local.to_path_buf(),
        source,
    })?;
    upload_children(store, entries, remote_parent.to_string()).await;
    Ok(())
}

/// Recurse into a confirmed remote folder. Boxed to break the async
/// recursion cycle.
fn descend(
    store: &dyn RemoteStore,
    dir: PathBuf,
    remote_parent: String,
) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
    Box::pin(async move {
        match fs::read_dir(&dir) {
            Ok(entries) => upload_children(store, entries, remote_parent).await,
            Err(error) => {
                warn!(path = %dir.display(), error = %error, "skipping unreadable directory");
            }
        }
    })
}

async fn upload_children(store: &dyn RemoteStore, entries: ReadDir, remote_parent: String) {
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            match store.create_folder(&remote_parent, &name).await {
                Ok(node) => descend(store, path, node.remote_id).await,
                Err(error) => {
                    // Folder was not created; the whole subtree is skipped.
                    warn!(
                        folder = %name,
                        parent = %remote_parent,
                        error = %error,
                        "remote folder creation failed, skipping subtree"
                    );
                }
            }
        } else if let Err(error) = store.upload_file(&remote_parent, &name, &path).await {
            // Individual upload failures never abort sibling uploads.
            warn!(
                file = %name,
                parent = %remote_parent,
                error = %error,
                "file upload failed, continuing with siblings"
            );
        }
    }
}
