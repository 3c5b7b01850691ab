//! # Design
//!
//! - Constant-message errors for the job pipeline.
//! - Validation failures form their own type: they are recovered at the
//!   boundary and never create a job.
//! - Pipeline failures carry the path or exit code that makes the failure
//!   reproducible in tests.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use urlstash_core::StoreError;

/// Convenience alias for pipeline results.
pub type JobResult<T> = Result<T, JobError>;

/// Submission validation failures, surfaced as user-facing messages.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The url field was empty.
    #[error("url is required")]
    MissingUrl,
    /// The destination project id was empty.
    #[error("destination project is required")]
    MissingDestination,
    /// The reachability probe could not connect or resolve the host.
    #[error("url host is unreachable")]
    UnreachableHost {
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The reachability probe returned a rejecting status code.
    #[error("url returned an invalid response")]
    InvalidResponse {
        /// HTTP status the probe received.
        status: u16,
    },
}

/// Fatal pipeline failures; every variant has already triggered cleanup by
/// the time it is reported.
#[derive(Debug, Error)]
pub enum JobError {
    /// The scratch workspace could not be created.
    #[error("failed to create workspace")]
    WorkspaceCreate {
        /// Path that failed to materialise.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The scratch workspace could not be destroyed.
    #[error("failed to destroy workspace")]
    WorkspaceDestroy {
        /// Path that failed to delete.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The retrieval tool could not be spawned.
    #[error("failed to launch retrieval tool")]
    RetrievalSpawn {
        /// Tool that failed to start.
        tool: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Waiting on the retrieval process failed.
    #[error("failed to supervise retrieval tool")]
    RetrievalWait {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The retrieval tool exited with a non-success code.
    #[error("retrieval tool exited unsuccessfully")]
    RetrievalFailed {
        /// Exit code, absent when the process died to a signal.
        exit_code: Option<i32>,
    },
    /// The mirror upload failed outright.
    #[error("mirror upload failed")]
    Upload {
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}
