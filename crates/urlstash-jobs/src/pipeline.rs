//! The job state machine: workspace → retrieval → mirror → cleanup.
//!
//! Every exit path funnels through one cleanup routine that kills the
//! retrieval process if it is still alive and destroys the workspace.
//! Cancellation and the wall-clock budget share a path: both are observed
//! at the pipeline's suspension points and end the job as `Cancelled`,
//! which is a terminal outcome, not an error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{info, warn};
use urlstash_core::{DownloadRequest, JobStatus, RemoteStore};
use urlstash_events::{Event, EventBus};
use urlstash_store::mirror;
use uuid::Uuid;

use crate::error::JobError;
use crate::retrieval::{RetrievalHandle, RetrievalSupervisor};
use crate::workspace::{Workspace, WorkspaceManager};

/// Everything one job needs to execute, assembled by the registry.
pub(crate) struct PipelineContext {
    pub(crate) job_id: Uuid,
    pub(crate) owner_id: String,
    pub(crate) request: DownloadRequest,
    pub(crate) store: Arc<dyn RemoteStore>,
    pub(crate) workspaces: WorkspaceManager,
    pub(crate) supervisor: RetrievalSupervisor,
    pub(crate) events: EventBus,
    pub(crate) budget: Duration,
}

/// Execute the pipeline to a terminal status.
pub(crate) async fn run(ctx: &PipelineContext, cancel: &mut watch::Receiver<bool>) -> JobStatus {
    let deadline = Instant::now() + ctx.budget;

    let workspace = match ctx.workspaces.create(&ctx.owner_id) {
        Ok(workspace) => workspace,
        Err(error) => return fail(ctx, &error),
    };

    let mut handle = match ctx.supervisor.start(&workspace, &ctx.request) {
        Ok(handle) => handle,
        Err(error) => {
            cleanup(ctx, None, &workspace).await;
            return fail(ctx, &error);
        }
    };
    ctx.events.publish(Event::RetrievalStarted { job_id: ctx.job_id });

    let waited = tokio::select! {
        () = wait_cancelled(cancel, deadline) => None,
        waited = handle.wait() => Some(waited),
    };
    match waited {
        None => {
            cleanup(ctx, Some(&mut handle), &workspace).await;
            return cancelled(ctx);
        }
        Some(Ok(status)) if status.success() => {
            ctx.events.publish(Event::RetrievalFinished {
                job_id: ctx.job_id,
                exit_code: status.code(),
            });
        }
        Some(Ok(status)) => {
            cleanup(ctx, Some(&mut handle), &workspace).await;
            return fail(
                ctx,
                &JobError::RetrievalFailed {
                    exit_code: status.code(),
                },
            );
        }
        Some(Err(error)) => {
            cleanup(ctx, Some(&mut handle), &workspace).await;
            return fail(ctx, &error);
        }
    }

    ctx.events.publish(Event::MirrorStarted { job_id: ctx.job_id });
    let mirrored = tokio::select! {
        () = wait_cancelled(cancel, deadline) => None,
        mirrored = mirror(
            ctx.store.as_ref(),
            &workspace.path,
            ctx.request.destination_path(),
        ) => Some(mirrored),
    };
    match mirrored {
        None => {
            cleanup(ctx, Some(&mut handle), &workspace).await;
            return cancelled(ctx);
        }
        Some(Err(source)) => {
            cleanup(ctx, Some(&mut handle), &workspace).await;
            return fail(ctx, &JobError::Upload { source });
        }
        Some(Ok(())) => {}
    }

    // Success path destroys the workspace unconditionally as its last step.
    if let Err(error) = ctx.workspaces.destroy(&workspace) {
        return fail(ctx, &error);
    }
    ctx.events.publish(Event::JobSucceeded { job_id: ctx.job_id });
    info!(job_id = %ctx.job_id, "download job completed");
    JobStatus::Succeeded
}

/// Shared cleanup routine for the failure and cancellation paths: kill the
/// retrieval process if still alive, then destroy the workspace. Both
/// halves tolerate already-finished state.
async fn cleanup(
    ctx: &PipelineContext,
    handle: Option<&mut RetrievalHandle>,
    workspace: &Workspace,
) {
    if let Some(handle) = handle {
        handle.kill().await;
    }
    if let Err(error) = ctx.workspaces.destroy(workspace) {
        warn!(
            job_id = %ctx.job_id,
            error = %failure_message(&error),
            "cleanup could not remove workspace"
        );
    }
}

fn fail(ctx: &PipelineContext, error: &JobError) -> JobStatus {
    let message = failure_message(error);
    warn!(job_id = %ctx.job_id, error = %message, "download job failed");
    ctx.events.publish(Event::JobFailed {
        job_id: ctx.job_id,
        message: message.clone(),
    });
    JobStatus::Failed { message }
}

fn cancelled(ctx: &PipelineContext) -> JobStatus {
    info!(job_id = %ctx.job_id, "download job cancelled");
    ctx.events.publish(Event::JobCancelled { job_id: ctx.job_id });
    JobStatus::Cancelled
}

/// Render the error and its source chain into one line for events.
fn failure_message(error: &JobError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Resolves when the job is cancelled or its wall-clock budget elapses;
/// pends forever when neither can happen any more.
async fn wait_cancelled(cancel: &mut watch::Receiver<bool>, deadline: Instant) {
    let signalled = async {
        if cancel.wait_for(|flag| *flag).await.is_err() {
            // Sender gone without signalling; only the deadline remains.
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        () = signalled => {}
        () = sleep_until(deadline) => {}
    }
}
