use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::FindOptions,
    Collection, Database,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntitlementStore, ProblemStore, StorageError, SubmissionStore};
use crate::models::answer::{NewSubmission, SubmissionRecord, SubmissionStatus};
use crate::models::Problem;

const PROBLEMS_COLLECTION: &str = "problems";
const SUBMISSIONS_COLLECTION: &str = "submissions";
const ENTITLEMENTS_COLLECTION: &str = "entitlements";

#[derive(Debug, Serialize, Deserialize)]
struct EntitlementRecord {
    learner_id: String,
    chapter_id: i64,
}

/// MongoDB-backed adapter for all three store traits.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn problems(&self) -> Collection<Problem> {
        self.db.collection(PROBLEMS_COLLECTION)
    }

    fn submissions(&self) -> Collection<SubmissionRecord> {
        self.db.collection(SUBMISSIONS_COLLECTION)
    }
}

fn connection_err(err: mongodb::error::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl ProblemStore for MongoStore {
    async fn get_problem(&self, id: i64) -> Result<Option<Problem>, StorageError> {
        self.problems()
            .find_one(doc! { "_id": id })
            .await
            .map_err(connection_err)
    }

    async fn list_chapter(&self, chapter_id: i64) -> Result<Vec<Problem>, StorageError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let mut cursor = self
            .problems()
            .find(doc! { "chapter_id": chapter_id })
            .with_options(options)
            .await
            .map_err(connection_err)?;

        let mut problems = Vec::new();
        while let Some(problem) = cursor.try_next().await.map_err(connection_err)? {
            problems.push(problem);
        }
        Ok(problems)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(connection_err)
    }
}

#[async_trait]
impl SubmissionStore for MongoStore {
    async fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StorageError> {
        let collection = self.submissions();

        let prior = collection
            .count_documents(doc! {
                "learner_id": &submission.learner_id,
                "problem_id": submission.problem_id,
            })
            .await
            .map_err(connection_err)?;

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

        collection
            .insert_one(&record)
            .await
            .map_err(connection_err)?;

        tracing::debug!(
            learner_id = %record.learner_id,
            problem_id = record.problem_id,
            attempt = record.attempt,
            "submission appended"
        );
        Ok(record)
    }
}

#[async_trait]
impl EntitlementStore for MongoStore {
    async fn is_entitled(&self, learner_id: &str, chapter_id: i64) -> Result<bool, StorageError> {
        let found = self
            .db
            .collection::<EntitlementRecord>(ENTITLEMENTS_COLLECTION)
            .find_one(doc! { "learner_id": learner_id, "chapter_id": chapter_id })
            .await
            .map_err(connection_err)?;
        Ok(found.is_some())
    }
}
