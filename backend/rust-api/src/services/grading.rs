use std::sync::Arc;

use thiserror::Error;

use crate::metrics::record_graded;
use crate::models::answer::{GradeResponse, GradingPolicy, NewSubmission};
use crate::services::{grader, AppState};
use crate::storage::{ProblemStore, StorageError, SubmissionStore};
use crate::utils::retry::{retry_with_config, RetryConfig};

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("problem {0} not found")]
    ProblemNotFound(i64),

    #[error("failed to load problem: {0}")]
    LoadFailed(#[source] StorageError),

    /// The grade was computed but the attempt record could not be persisted.
    /// Must never be reported to the learner as a wrong answer.
    #[error("failed to record submission: {0}")]
    SubmitFailed(#[source] StorageError),
}

/// The server-side grading pipeline: load the problem, rule-grade the raw
/// answer, append the attempt record. Score computation and the persistence
/// write are not transactional; a write failure surfaces as `SubmitFailed`.
pub struct GradingService {
    problems: Arc<dyn ProblemStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl GradingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            problems: state.problems.clone(),
            submissions: state.submissions.clone(),
        }
    }

    pub async fn submit(
        &self,
        learner_id: &str,
        problem_id: i64,
        answer: &str,
    ) -> Result<GradeResponse, GradingError> {
        tracing::info!(learner_id, problem_id, "processing answer submission");

        let problem = retry_with_config(RetryConfig::default(), || async move {
            self.problems.get_problem(problem_id).await
        })
        .await
        .map_err(GradingError::LoadFailed)?
        .ok_or(GradingError::ProblemNotFound(problem_id))?;

        let result = grader::grade(problem.grading_type(), problem.answer_key.as_ref(), answer);

        let outcome = if !result.confident {
            "indeterminate"
        } else if result.score > 0 {
            "correct"
        } else {
            "incorrect"
        };
        record_graded(outcome);

        let score = result.score;
        let confident = result.confident;
        let record = retry_with_config(RetryConfig::aggressive(), || async move {
            self.submissions
                .append(NewSubmission {
                    learner_id: learner_id.to_string(),
                    problem_id,
                    answer_raw: answer.to_string(),
                    score,
                    confident,
                })
                .await
        })
        .await
        .map_err(GradingError::SubmitFailed)?;

        tracing::info!(
            learner_id,
            problem_id,
            attempt = record.attempt,
            score = result.score,
            confident = result.confident,
            "answer graded"
        );

        Ok(GradeResponse {
            score: result.score,
            confident: result.confident,
            feedback: result.note,
            policy: GradingPolicy::Rule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{AnswerKey, Problem, ProblemBody, ProblemType};
    use crate::storage::memory::InMemoryStore;

    fn state_with(store: InMemoryStore) -> AppState {
        AppState::with_stores(
            Config::for_tests(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        )
    }

    fn mcq_problem(id: i64) -> Problem {
        Problem {
            id,
            chapter_id: 1,
            problem_type: ProblemType::Mcq,
            body: ProblemBody::Plain("pick one".to_string()),
            grading_mode: None,
            answer_key: Some(AnswerKey::Choice {
                correct: vec!["A".to_string()],
            }),
        }
    }

    #[tokio::test]
    async fn submit_grades_and_records_attempt() {
        let store = InMemoryStore::new();
        store.insert_problem(mcq_problem(1));
        let state = state_with(store.clone());

        let service = GradingService::new(&state);
        let response = service.submit("learner-1", 1, " a ").await.unwrap();

        assert_eq!(response.score, 1);
        assert!(response.confident);
        assert_eq!(response.policy, GradingPolicy::Rule);

        let submissions = store.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].attempt, 1);
        assert_eq!(submissions[0].answer_raw, " a ");
    }

    #[tokio::test]
    async fn missing_problem_creates_no_record() {
        let store = InMemoryStore::new();
        let state = state_with(store.clone());

        let service = GradingService::new(&state);
        let err = service.submit("learner-1", 404, "A").await.unwrap_err();

        assert!(matches!(err, GradingError::ProblemNotFound(404)));
        assert!(store.submissions().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_is_distinct_from_wrong_answer() {
        let store = InMemoryStore::new();
        store.insert_problem(mcq_problem(1));
        store.fail_submissions(true);
        let state = state_with(store.clone());

        let service = GradingService::new(&state);
        let err = service.submit("learner-1", 1, "A").await.unwrap_err();

        assert!(matches!(err, GradingError::SubmitFailed(_)));
    }
}
