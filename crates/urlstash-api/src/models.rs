//! Wire models for the download endpoints.

use serde::{Deserialize, Serialize};

/// Body of a download submission.
///
/// All fields default when absent so partial payloads validate instead of
/// failing deserialization; the handlers report the missing pieces with
/// user-facing messages.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Source url to retrieve, possibly with trailing junk to sanitize.
    #[serde(default)]
    pub url: String,
    /// Whether the retrieval tool should follow links recursively.
    #[serde(default)]
    pub recursive: bool,
    /// Whether to wait between requests during retrieval.
    #[serde(default)]
    pub interval: bool,
    /// Wait duration in seconds, passed through to the tool verbatim.
    #[serde(default, rename = "intervalValue")]
    pub interval_value: String,
    /// Destination project identifier.
    #[serde(default)]
    pub pid: String,
    /// Destination folder path; defaults to the storage provider root.
    #[serde(default, rename = "folderId")]
    pub folder_id: Option<String>,
}

/// Response body shared by the submission and cancellation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    /// Outcome marker: `OK`, `Failed`, or `No download tasks`.
    pub status: &'static str,
    /// Human-readable detail, absent on plain acceptance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl TaskResponse {
    /// Plain acceptance, no message.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: "OK",
            message: None,
        }
    }

    /// Acceptance with a detail message.
    #[must_use]
    pub const fn ok_with(message: &'static str) -> Self {
        Self {
            status: "OK",
            message: Some(message),
        }
    }

    /// Rejection with a user-facing message.
    #[must_use]
    pub const fn failed(message: &'static str) -> Self {
        Self {
            status: "Failed",
            message: Some(message),
        }
    }
}
