use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::auth::AuthContext,
    models::answer::{GradeRequest, GradeResponse},
    services::{
        grading::{GradingError, GradingService},
        AppState,
    },
};

/// Grades one raw answer and appends the attempt record.
///
/// Learner identity comes from the bearer token when present; the
/// unauthenticated variant supplies `learner_id` in the body instead.
pub async fn grade_answer(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    AppJson(req): AppJson<GradeRequest>,
) -> Result<Json<GradeResponse>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request_detail("invalid_request", e.to_string()))?;

    let learner_id = auth
        .claims
        .map(|claims| claims.sub)
        .or(req.learner_id)
        .ok_or(ApiError::bad_request("missing_learner"))?;

    let service = GradingService::new(&state);

    match service.submit(&learner_id, req.problem_id, &req.answer).await {
        Ok(response) => Ok(Json(response)),
        Err(GradingError::ProblemNotFound(problem_id)) => {
            tracing::warn!(problem_id, "grade request for unknown problem");
            Err(ApiError::NotFound("problem_not_found"))
        }
        Err(GradingError::LoadFailed(e)) => {
            tracing::error!("Failed to load problem for grading: {}", e);
            Err(ApiError::internal("load_failed", e.to_string()))
        }
        Err(GradingError::SubmitFailed(e)) => {
            tracing::error!("Graded but failed to record submission: {}", e);
            Err(ApiError::internal("submit_failed", e.to_string()))
        }
    }
}
