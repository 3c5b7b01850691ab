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

//! Job lifecycle event bus.
//!
//! The bus provides a typed event enum with sequential identifiers on top of
//! `tokio::broadcast`. It carries the activity trail the original system
//! wrote into node logs: one event per job transition, consumed by the
//! bootstrap's logging subscriber and by tests.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};
use uuid::Uuid;

/// Identifier assigned to each event emitted by the service.
pub type EventId = u64;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 1_024;

/// Typed job lifecycle events surfaced across the system.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A validated submission was accepted and enqueued.
    JobQueued {
        /// Job identifier.
        job_id: Uuid,
        /// Sanitized source URL.
        url: String,
    },
    /// The external retrieval process was spawned.
    RetrievalStarted {
        /// Job identifier.
        job_id: Uuid,
    },
    /// The external retrieval process exited.
    RetrievalFinished {
        /// Job identifier.
        job_id: Uuid,
        /// Exit code, when the process was not killed by a signal.
        exit_code: Option<i32>,
    },
    /// The mirror upload into the remote store began.
    MirrorStarted {
        /// Job identifier.
        job_id: Uuid,
    },
    /// The job completed successfully and its workspace is gone.
    JobSucceeded {
        /// Job identifier.
        job_id: Uuid,
    },
    /// The job failed; cleanup has already run.
    JobFailed {
        /// Job identifier.
        job_id: Uuid,
        /// Failure detail.
        message: String,
    },
    /// The job was cancelled; cleanup has already run.
    JobCancelled {
        /// Job identifier.
        job_id: Uuid,
    },
}

impl Event {
    /// Machine-friendly discriminator for logging consumers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::JobQueued { .. } => "job_queued",
            Self::RetrievalStarted { .. } => "retrieval_started",
            Self::RetrievalFinished { .. } => "retrieval_finished",
            Self::MirrorStarted { .. } => "mirror_started",
            Self::JobSucceeded { .. } => "job_succeeded",
            Self::JobFailed { .. } => "job_failed",
            Self::JobCancelled { .. } => "job_cancelled",
        }
    }

    /// Job the event belongs to.
    #[must_use]
    pub const fn job_id(&self) -> Uuid {
        match self {
            Self::JobQueued { job_id, .. }
            | Self::RetrievalStarted { job_id }
            | Self::RetrievalFinished { job_id, .. }
            | Self::MirrorStarted { job_id }
            | Self::JobSucceeded { job_id }
            | Self::JobFailed { job_id, .. }
            | Self::JobCancelled { job_id } => *job_id,
        }
    }
}

/// Metadata wrapper around events carrying the id and emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned at publish time.
    pub id: EventId,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// The event itself.
    pub event: Event,
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    next_id: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_id: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1)),
        }
    }

    /// Construct a bus with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Publish a new event to the bus, assigning it a sequential identifier.
    ///
    /// Events published while no subscriber is attached are dropped, which
    /// is the desired behaviour for an activity trail.
    pub fn publish(&self, event: Event) -> EventId {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper over the live broadcast channel.
pub struct EventStream {
    receiver: Receiver<EventEnvelope>,
}

impl EventStream {
    /// Receive the next event; skips ahead when the subscriber lagged.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
