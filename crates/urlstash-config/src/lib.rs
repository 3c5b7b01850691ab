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

//! Environment-backed configuration for the urlstash service.
//!
//! Layout: `model.rs` (typed settings and defaults), `loader.rs`
//! (environment loading and validation), `error.rs` (config errors).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_from_env;
pub use model::Settings;
