//! Storage collaborators behind narrow async traits.
//!
//! The core never constructs its backing clients; adapters are built at the
//! process boundary (`main.rs`, the test harness) and injected through
//! `AppState`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::answer::{NewSubmission, SubmissionRecord};
use crate::models::Problem;

pub mod memory;
pub mod mongo;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only access to the problem bank.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn get_problem(&self, id: i64) -> Result<Option<Problem>, StorageError>;

    /// All problems of a chapter, ordered ascending by id.
    async fn list_chapter(&self, chapter_id: i64) -> Result<Vec<Problem>, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}

/// Append-only submission history.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Appends an attempt, assigning the next attempt ordinal for the
    /// `(learner, problem)` pair.
    async fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StorageError>;
}

/// Entitlement facts resolved by the external authorization collaborator.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn is_entitled(&self, learner_id: &str, chapter_id: i64) -> Result<bool, StorageError>;
}
