//! Session-scoped job bookkeeping.
//!
//! Each session owns a list of job handles. Submission sweeps finished
//! handles out of the list before enqueuing, so the list only ever holds
//! jobs that are (or recently were) live. Cancelling a session removes the
//! list unconditionally and reports how many jobs were actually signalled.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};
use urlstash_core::{DownloadRequest, JobDescriptor, JobStatus, RemoteStoreFactory};
use urlstash_events::{Event, EventBus};
use uuid::Uuid;

use crate::pipeline::{self, PipelineContext};
use crate::retrieval::RetrievalSupervisor;
use crate::workspace::WorkspaceManager;

/// Static configuration for the registry, carved out of the service
/// settings.
#[derive(Debug, Clone)]
pub struct JobRegistryConfig {
    /// Root directory under which per-job workspaces are created.
    pub scratch_root: PathBuf,
    /// Executable name or path of the external retrieval tool.
    pub retrieval_tool: String,
    /// Wall-clock budget after which a job is force-cancelled.
    pub job_budget: Duration,
}

/// Handle to one spawned job: its identity, a live status view, and the
/// cancellation trigger.
struct JobHandle {
    id: Uuid,
    status: watch::Receiver<JobStatus>,
    cancel: watch::Sender<bool>,
}

impl JobHandle {
    fn status(&self) -> JobStatus {
        self.status.borrow().clone()
    }

    /// Signal cancellation if the job has not already reached a terminal
    /// state. Returns whether a signal was actually delivered.
    fn signal_cancel(&self) -> bool {
        if self.status().is_terminal() {
            return false;
        }
        self.cancel.send(true).is_ok()
    }
}

/// Spawns jobs and tracks them per session.
pub struct JobRegistry {
    workspaces: WorkspaceManager,
    supervisor: RetrievalSupervisor,
    stores: Arc<dyn RemoteStoreFactory>,
    events: EventBus,
    budget: Duration,
    sessions: Mutex<HashMap<String, Vec<JobHandle>>>,
}

impl JobRegistry {
    /// Construct a registry from service settings plus the store factory
    /// and event bus shared with the rest of the service.
    #[must_use]
    pub fn new(
        config: &JobRegistryConfig,
        stores: Arc<dyn RemoteStoreFactory>,
        events: EventBus,
    ) -> Self {
        Self {
            workspaces: WorkspaceManager::new(&config.scratch_root),
            supervisor: RetrievalSupervisor::new(&config.retrieval_tool),
            stores,
            events,
            budget: config.job_budget,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Enqueue a job for `session_id` and return its id. The job starts
    /// running immediately on the async runtime; this call never waits for
    /// it.
    ///
    /// `credential` is forwarded to the remote store as-is and is never
    /// logged.
    pub fn submit(&self, session_id: &str, credential: &str, request: DownloadRequest) -> Uuid {
        let job_id = Uuid::new_v4();
        let (status_tx, status_rx) = watch::channel(JobStatus::Pending);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        self.events.publish(Event::JobQueued {
            job_id,
            url: request.url.clone(),
        });
        info!(job_id = %job_id, url = %request.url, "download job enqueued");

        let ctx = PipelineContext {
            job_id,
            owner_id: session_id.to_string(),
            store: self.stores.for_job(credential, &request.destination_project_id),
            request,
            workspaces: self.workspaces.clone(),
            supervisor: self.supervisor.clone(),
            events: self.events.clone(),
            budget: self.budget,
        };
        tokio::spawn(async move {
            let mut cancel_rx = cancel_rx;
            let _ = status_tx.send(JobStatus::Running);
            let outcome = pipeline::run(&ctx, &mut cancel_rx).await;
            info!(job_id = %job_id, outcome = outcome.kind(), "download job settled");
            let _ = status_tx.send(outcome);
        });

        let handle = JobHandle {
            id: job_id,
            status: status_rx,
            cancel: cancel_tx,
        };
        {
            let mut sessions = self.sessions.lock().expect("sessions mutex poisoned");
            let tracked = sessions.entry(session_id.to_string()).or_default();
            let before = tracked.len();
            tracked.retain(|job| !job.status().is_terminal());
            if tracked.len() < before {
                debug!(swept = before - tracked.len(), "swept finished jobs");
            }
            tracked.push(handle);
        }
        job_id
    }

    /// Cancel every tracked job of `session_id` and return how many were
    /// actually signalled. The tracked list is cleared unconditionally, so
    /// finished jobs stop being tracked even when nothing was signalled.
    pub fn cancel_all(&self, session_id: &str) -> usize {
        let jobs = {
            let mut sessions = self.sessions.lock().expect("sessions mutex poisoned");
            sessions.remove(session_id)
        };
        let Some(jobs) = jobs else {
            return 0;
        };
        let signalled = jobs.iter().filter(|job| job.signal_cancel()).count();
        if signalled > 0 {
            info!(count = signalled, "cancelled active download jobs");
        }
        signalled
    }

    /// Snapshot the jobs currently tracked for `session_id`.
    #[must_use]
    pub fn tracked(&self, session_id: &str) -> Vec<JobDescriptor> {
        let sessions = self.sessions.lock().expect("sessions mutex poisoned");
        sessions.get(session_id).map_or_else(Vec::new, |jobs| {
            jobs.iter()
                .map(|job| JobDescriptor {
                    id: job.id,
                    status: job.status(),
                })
                .collect()
        })
    }
}
