use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{EntitlementStore, ProblemStore, StorageError, SubmissionStore};
use crate::models::answer::{NewSubmission, SubmissionRecord, SubmissionStatus};
use crate::models::Problem;

#[derive(Default)]
struct Inner {
    problems: BTreeMap<i64, Problem>,
    submissions: Vec<SubmissionRecord>,
    entitlements: HashSet<(String, i64)>,
    fail_submissions: bool,
    fail_listing: bool,
}

/// In-memory adapter implementing all three store traits. Used by the
/// integration tests and as a zero-dependency dev backend. Cloning shares
/// the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_problem(&self, problem: Problem) {
        let mut inner = self.inner.lock().unwrap();
        inner.problems.insert(problem.id, problem);
    }

    pub fn grant_entitlement(&self, learner_id: &str, chapter_id: i64) {
        let mut inner = self.inner.lock().unwrap();
        inner.entitlements.insert((learner_id.to_string(), chapter_id));
    }

    /// Makes every subsequent `append` fail, for exercising the
    /// grade-computed-but-not-recorded path.
    pub fn fail_submissions(&self, fail: bool) {
        self.inner.lock().unwrap().fail_submissions = fail;
    }

    pub fn fail_listing(&self, fail: bool) {
        self.inner.lock().unwrap().fail_listing = fail;
    }

    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.inner.lock().unwrap().submissions.clone()
    }
}

#[async_trait]
impl ProblemStore for InMemoryStore {
    async fn get_problem(&self, id: i64) -> Result<Option<Problem>, StorageError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.problems.get(&id).cloned())
    }

    async fn list_chapter(&self, chapter_id: i64) -> Result<Vec<Problem>, StorageError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_listing {
            return Err(StorageError::Connection(
                "simulated listing failure".to_string(),
            ));
        }
        // BTreeMap iteration already yields ascending ids.
        Ok(inner
            .problems
            .values()
            .filter(|p| p.chapter_id == chapter_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_submissions {
            return Err(StorageError::Connection(
                "simulated submission write failure".to_string(),
            ));
        }

        let prior = inner
            .submissions
            .iter()
            .filter(|s| {
                s.learner_id == submission.learner_id && s.problem_id == submission.problem_id
            })
            .count();

        let record = SubmissionRecord {
            id: Uuid::new_v4().to_string(),
            learner_id: submission.learner_id,
            problem_id: submission.problem_id,
            attempt: prior as u32 + 1,
            answer_raw: submission.answer_raw,
            score: submission.score,
            confident: submission.confident,
            status: SubmissionStatus::Graded,
            submitted_at: Utc::now(),
        };
        inner.submissions.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl EntitlementStore for InMemoryStore {
    async fn is_entitled(&self, learner_id: &str, chapter_id: i64) -> Result<bool, StorageError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .entitlements
            .contains(&(learner_id.to_string(), chapter_id)))
    }
}
