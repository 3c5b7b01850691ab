#![forbid(unsafe_code)]

//! HTTP surface of the service: submission and cancellation endpoints plus
//! a liveness probe.
//!
//! The wire contract is deliberate: validation failures and cancellation
//! outcomes are reported inside a 200 response body, with `status` and
//! `message` fields describing the result.

mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use models::{SubmitRequest, TaskResponse};
pub use router::ApiServer;
pub use state::ApiState;
