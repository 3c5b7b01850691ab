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

//! Remote store client and mirror uploader.
//!
//! Layout: `client.rs` (HTTP client for the store contract), `mirror.rs`
//! (recursive tree-to-store replication).

pub mod client;
pub mod mirror;

pub use client::{HttpStore, HttpStoreFactory};
pub use mirror::mirror;
