use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GradeRequest {
    pub problem_id: i64,
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,
    /// Explicit learner identity for the unauthenticated variant. Ignored
    /// when a valid bearer token is presented.
    #[serde(default)]
    pub learner_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeResponse {
    pub score: u8,
    /// False when the grader could not interpret the input (numeric parse
    /// failure, free-text type). Distinct from a wrong answer.
    pub confident: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub policy: GradingPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingPolicy {
    Rule,
}

/// Input to the submission store. The store assigns id, attempt ordinal,
/// status and timestamp at append time.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub learner_id: String,
    pub problem_id: i64,
    pub answer_raw: String,
    pub score: u8,
    pub confident: bool,
}

/// Append-only attempt record. Never mutated after creation; retries of a
/// failed round-trip create additional attempts rather than rewriting one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub learner_id: String,
    pub problem_id: i64,
    pub attempt: u32,
    pub answer_raw: String,
    pub score: u8,
    pub confident: bool,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Graded,
}
