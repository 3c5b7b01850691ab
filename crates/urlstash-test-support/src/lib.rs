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

//! Shared test helpers used across the urlstash suites.
//! Layout: fixtures.rs (local tree builders), mocks.rs (fake remote store).

pub mod fixtures;
pub mod mocks;

pub use fixtures::build_tree;
pub use mocks::{RecordingStore, StoreCall};
