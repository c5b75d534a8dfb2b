use std::sync::Arc;

use thiserror::Error;

use crate::metrics::record_listing;
use crate::models::Problem;
use crate::services::AppState;
use crate::storage::{ProblemStore, StorageError};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to load problems: {0}")]
    ListFailed(#[source] StorageError),
}

/// Read-only view on the problem bank.
pub struct ContentService {
    problems: Arc<dyn ProblemStore>,
}

impl ContentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            problems: state.problems.clone(),
        }
    }

    /// The ordered problem list of a chapter. Answer keys stay on the
    /// `Problem` model here; the handler maps to a key-free view before
    /// anything crosses the wire.
    pub async fn list_problems(&self, chapter_id: i64) -> Result<Vec<Problem>, ContentError> {
        let problems = self.problems.list_chapter(chapter_id).await.map_err(|e| {
            record_listing("error");
            ContentError::ListFailed(e)
        })?;

        record_listing("ok");
        tracing::debug!(chapter_id, count = problems.len(), "chapter problems loaded");
        Ok(problems)
    }
}
