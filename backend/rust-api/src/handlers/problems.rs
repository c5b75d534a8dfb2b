use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    handlers::ApiError,
    middlewares::auth::JwtClaims,
    models::{Problem, ProblemBody, ProblemType},
    services::{content::ContentService, AppState},
};

/// Wire view of a problem: everything the client renders, never the answer
/// key.
#[derive(Debug, Serialize)]
pub struct ProblemView {
    pub id: i64,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub body: ProblemBody,
    pub chapter_id: i64,
}

impl From<Problem> for ProblemView {
    fn from(problem: Problem) -> Self {
        Self {
            id: problem.id,
            problem_type: problem.problem_type,
            body: problem.body,
            chapter_id: problem.chapter_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProblemsResponse {
    pub problems: Vec<ProblemView>,
}

pub async fn list_problems(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(chapter_id): Path<i64>,
) -> Result<Json<ProblemsResponse>, ApiError> {
    tracing::info!(learner_id = %claims.sub, chapter_id, "listing chapter problems");

    let entitled = state
        .entitlements
        .is_entitled(&claims.sub, chapter_id)
        .await
        .map_err(|e| ApiError::internal("load_failed", e.to_string()))?;

    if !entitled {
        tracing::warn!(learner_id = %claims.sub, chapter_id, "entitlement check failed");
        return Err(ApiError::Forbidden("not_entitled"));
    }

    let service = ContentService::new(&state);
    let problems = service
        .list_problems(chapter_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list problems: {}", e);
            ApiError::internal("load_failed", e.to_string())
        })?;

    Ok(Json(ProblemsResponse {
        problems: problems.into_iter().map(ProblemView::from).collect(),
    }))
}
