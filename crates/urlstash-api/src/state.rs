//! Shared application state threaded through the router.

use std::sync::Arc;

use urlstash_jobs::JobRegistry;

/// Dependencies the handlers need: the job registry and the HTTP client
/// used for reachability probes.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) registry: Arc<JobRegistry>,
    pub(crate) probe: reqwest::Client,
}

impl ApiState {
    /// Bundle the registry and probe client into router state.
    #[must_use]
    pub fn new(registry: Arc<JobRegistry>, probe: reqwest::Client) -> Self {
        Self { registry, probe }
    }
}
