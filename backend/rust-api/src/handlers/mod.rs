use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub mod grade;
pub mod problems;

/// Uniform JSON error surface: `{ "error": code, "detail"?: string }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str, Option<String>),
    Forbidden(&'static str),
    NotFound(&'static str),
    Internal(&'static str, Option<String>),
}

impl ApiError {
    pub fn bad_request(code: &'static str) -> Self {
        ApiError::BadRequest(code, None)
    }

    pub fn bad_request_detail(code: &'static str, detail: impl Into<String>) -> Self {
        ApiError::BadRequest(code, Some(detail.into()))
    }

    pub fn internal(code: &'static str, detail: impl Into<String>) -> Self {
        ApiError::Internal(code, Some(detail.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            ApiError::BadRequest(code, detail) => (StatusCode::BAD_REQUEST, code, detail),
            ApiError::Forbidden(code) => (StatusCode::FORBIDDEN, code, None),
            ApiError::NotFound(code) => (StatusCode::NOT_FOUND, code, None),
            ApiError::Internal(code, detail) => (StatusCode::INTERNAL_SERVER_ERROR, code, detail),
        };

        let mut body = json!({ "error": code });
        if let Some(detail) = detail {
            body["detail"] = json!(detail);
        }
        (status, Json(body)).into_response()
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut status = "healthy";
    let mut dependencies = serde_json::Map::new();

    let storage_health = check_storage(&state).await;
    let storage_healthy = storage_health.get("status").and_then(|v| v.as_str()) == Some("healthy");
    dependencies.insert("storage".to_string(), json!(storage_health));
    if !storage_healthy {
        status = "degraded";
    }

    let status_code = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "workbook-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": dependencies
        })),
    )
}

async fn check_storage(state: &AppState) -> serde_json::Map<String, serde_json::Value> {
    let mut result = serde_json::Map::new();

    match tokio::time::timeout(std::time::Duration::from_secs(1), state.problems.ping()).await {
        Ok(Ok(())) => {
            result.insert("status".to_string(), json!("healthy"));
        }
        Ok(Err(e)) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!(format!("storage error: {}", e)));
        }
        Err(_) => {
            result.insert("status".to_string(), json!("unhealthy"));
            result.insert("error".to_string(), json!("storage timeout after 1s"));
        }
    }

    result
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Protects /metrics with HTTP Basic Auth (`METRICS_AUTH=user:password`).
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());

    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
