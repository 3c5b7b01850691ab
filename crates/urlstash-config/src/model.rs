//! Typed configuration model and defaults.
//!
//! # Design
//! - Pure data carrier used by the loader and the application bootstrap.
//! - Defaults match the original deployment: `wget` as the retrieval tool,
//!   a `tmp` scratch root, and a local store endpoint.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

/// Default API bind address.
pub(crate) const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8085";
/// Default scratch root; workspaces live under `<root>/urlstash/`.
pub(crate) const DEFAULT_SCRATCH_ROOT: &str = "tmp";
/// Default external retrieval tool.
pub(crate) const DEFAULT_RETRIEVAL_TOOL: &str = "wget";
/// Default remote store endpoint.
pub(crate) const DEFAULT_STORE_URL: &str = "http://localhost:7777";
/// Default per-job wall-clock budget in seconds.
pub(crate) const DEFAULT_JOB_BUDGET_SECS: u64 = 3_600;

/// Resolved service settings.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Address the API server binds to.
    pub bind_addr: SocketAddr,
    /// Directory that holds per-job scratch workspaces.
    pub scratch_root: PathBuf,
    /// Executable invoked to fetch the submitted URL.
    pub retrieval_tool: String,
    /// Base URL of the remote storage service.
    pub store_base_url: Url,
    /// Wall-clock budget per job; exceeding it cancels the job.
    #[serde(with = "budget_secs")]
    pub job_budget: Duration,
}

mod budget_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub(crate) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}
