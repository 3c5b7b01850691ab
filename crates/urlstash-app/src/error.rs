//! # Design
//!
//! - Centralize application-level errors for the boot sequence.
//! - Keep error messages constant while carrying context fields for
//!   debugging.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use urlstash_config::ConfigError;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        #[source]
        source: ConfigError,
    },
    /// Building the shared HTTP client failed.
    #[error("http client construction failed")]
    Http {
        /// Operation identifier.
        operation: &'static str,
        /// Source HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// Binding the listen address failed.
    #[error("failed to bind listen address")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Source IO error.
        #[source]
        source: io::Error,
    },
    /// The API server stopped with an error.
    #[error("api server stopped")]
    Serve {
        /// Source IO error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn errors_keep_constant_messages_and_sources() {
        let err = AppError::Bind {
            addr: "127.0.0.1:8085".parse().expect("valid addr"),
            source: io::Error::other("in use"),
        };
        assert_eq!(err.to_string(), "failed to bind listen address");
        assert!(err.source().is_some());

        let err = AppError::Config {
            operation: "settings.load",
            source: ConfigError::InvalidField {
                field: "URLSTASH_JOB_BUDGET_SECS",
                reason: "must be a positive integer",
                value: Some("zero".to_string()),
            },
        };
        assert_eq!(err.to_string(), "configuration operation failed");
    }
}
