//! Store-agnostic trait seams between the job pipeline and the remote
//! store client.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::RemoteNode;

/// Remote storage service the mirror uploader replays a tree into.
///
/// `parent` is the `/`-delimited destination path: the provider name
/// followed by the folder path inside it (for example `osfstorage/` or the
/// `remote_id` of a previously created folder).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create a folder named `name` under `parent`, returning the node the
    /// store allocated for it.
    async fn create_folder(&self, parent: &str, name: &str) -> StoreResult<RemoteNode>;

    /// Upload the file at `local` under `parent` as `name`.
    async fn upload_file(&self, parent: &str, name: &str, local: &Path) -> StoreResult<()>;
}

/// Builds a store client scoped to one job's credential and project.
pub trait RemoteStoreFactory: Send + Sync {
    /// Construct a store handle bound to the given session cookie and
    /// destination project.
    fn for_job(&self, cookie: &str, project_id: &str) -> Arc<dyn RemoteStore>;
}
