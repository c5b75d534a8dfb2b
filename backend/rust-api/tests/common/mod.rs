#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use workbook_api::middlewares::auth::{JwtClaims, JwtService};
use workbook_api::models::{AnswerKey, Problem, ProblemBody, ProblemType};
use workbook_api::storage::memory::InMemoryStore;
use workbook_api::{create_router, AppState, Config};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const LEARNER: &str = "learner-1";
pub const CHAPTER: i64 = 1;

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "workbook_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();

    store.insert_problem(Problem {
        id: 101,
        chapter_id: CHAPTER,
        problem_type: ProblemType::Mcq,
        body: ProblemBody::Structured {
            prompt: "What is 2 + 2?".to_string(),
            choices: Some(vec!["A. 4".to_string(), "B. 5".to_string()]),
            placeholder: None,
        },
        grading_mode: None,
        answer_key: Some(AnswerKey::Choice {
            correct: vec!["A".to_string()],
        }),
    });

    store.insert_problem(Problem {
        id: 102,
        chapter_id: CHAPTER,
        problem_type: ProblemType::Numeric,
        body: ProblemBody::Plain("Give pi to two decimal places".to_string()),
        grading_mode: None,
        answer_key: Some(AnswerKey::Numeric {
            value: 3.14,
            tol_abs: 0.01,
        }),
    });

    store.insert_problem(Problem {
        id: 103,
        chapter_id: CHAPTER,
        problem_type: ProblemType::Essay,
        body: ProblemBody::Structured {
            prompt: "Explain your reasoning".to_string(),
            choices: None,
            placeholder: Some("Write a short paragraph".to_string()),
        },
        grading_mode: None,
        answer_key: None,
    });

    // 3.5 - 3.0 and 0.5 are exactly representable; used for the inclusive
    // tolerance boundary check.
    store.insert_problem(Problem {
        id: 104,
        chapter_id: CHAPTER,
        problem_type: ProblemType::Numeric,
        body: ProblemBody::Plain("Estimate the value".to_string()),
        grading_mode: None,
        answer_key: Some(AnswerKey::Numeric {
            value: 3.0,
            tol_abs: 0.5,
        }),
    });

    store.grant_entitlement(LEARNER, CHAPTER);
    store
}

pub fn create_test_app() -> (Router, InMemoryStore) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = seeded_store();
    let state = Arc::new(AppState::with_stores(
        test_config(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    ));

    (create_router(state), store)
}

pub fn auth_token(learner: &str) -> String {
    let service = JwtService::new(TEST_JWT_SECRET);
    service
        .generate_token(JwtClaims {
            sub: learner.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            iat: chrono::Utc::now().timestamp() as usize,
        })
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(
            builder
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
