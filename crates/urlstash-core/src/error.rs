//! # Design
//!
//! - Constant-message errors for remote store operations.
//! - Carry the operation identifier and offending input as fields so
//!   failures stay reproducible in tests.
//! - Keep transport sources boxed so the trait seam stays client-agnostic.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for remote store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced while talking to the remote store or walking the
/// local mirror root.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure issuing a request.
    #[error("remote store request failed")]
    Request {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store answered with an unexpected status code.
    #[error("remote store rejected the request")]
    UnexpectedStatus {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status returned by the store.
        status: u16,
    },
    /// The store response body did not carry the expected fields.
    #[error("remote store response was malformed")]
    MalformedResponse {
        /// Operation identifier.
        operation: &'static str,
        /// Static reason describing the missing piece.
        reason: &'static str,
    },
    /// Destination path could not be split into provider and path.
    #[error("invalid destination path")]
    InvalidDestination {
        /// Offending destination value.
        destination: String,
    },
    /// The mirror root could not be listed at all.
    #[error("failed to list mirror root")]
    ListRoot {
        /// Local path that failed to list.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_stay_constant() {
        let err = StoreError::UnexpectedStatus {
            operation: "create_folder",
            status: 409,
        };
        assert_eq!(err.to_string(), "remote store rejected the request");

        let err = StoreError::ListRoot {
            path: PathBuf::from("/tmp/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "failed to list mirror root");
        assert!(std::error::Error::source(&err).is_some());
    }
}
