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

//! Store-agnostic download DTOs and shared error taxonomy.
//!
//! Layout: `model.rs` (request/job/remote-node types), `error.rs` (store
//! error taxonomy), `service.rs` (remote store trait seams).

pub mod error;
pub mod model;
pub mod service;

pub use error::{StoreError, StoreResult};
pub use model::{
    DEFAULT_DESTINATION, DownloadRequest, JobDescriptor, JobStatus, RemoteKind, RemoteNode,
};
pub use service::{RemoteStore, RemoteStoreFactory};
