#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Background job pipeline: validation, workspace lifecycle, retrieval
//! process supervision, mirror orchestration, and per-session tracking.
//!
//! Layout: `validate.rs` (submission checks), `workspace.rs` (scratch
//! directories), `retrieval.rs` (external tool supervision), `pipeline.rs`
//! (the job state machine), `registry.rs` (session-scoped bookkeeping).

pub mod error;
pub mod pipeline;
pub mod registry;
pub mod retrieval;
pub mod validate;
pub mod workspace;

pub use error::{JobError, JobResult, ValidationError};
pub use registry::{JobRegistry, JobRegistryConfig};
pub use retrieval::{RetrievalHandle, RetrievalSupervisor};
pub use validate::{check_reachable, check_required, sanitize_url};
pub use workspace::{Workspace, WorkspaceManager};
