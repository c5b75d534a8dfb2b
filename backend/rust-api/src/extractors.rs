use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON extractor that rejects with a structured JSON error body instead of
/// axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let detail = format!("Failed to parse JSON request body: {}", rejection);
                tracing::warn!("{}", detail);
                let body = json!({
                    "error": "invalid_json",
                    "detail": detail,
                });
                Err((StatusCode::BAD_REQUEST, Json(body)).into_response())
            }
        }
    }
}
