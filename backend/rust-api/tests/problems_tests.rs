mod common;

use axum::http::StatusCode;

use common::{auth_token, body_json, create_test_app, get, CHAPTER, LEARNER};

#[tokio::test]
async fn listing_is_ordered_and_withholds_answer_keys() {
    let (app, _store) = create_test_app();
    let token = auth_token(LEARNER);

    let response = get(
        &app,
        &format!("/api/v1/chapters/{}/problems", CHAPTER),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let problems = json["problems"].as_array().unwrap();

    let ids: Vec<i64> = problems
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![101, 102, 103, 104]);

    for problem in problems {
        assert!(problem.get("answer_key").is_none());
        assert!(problem.get("grading_mode").is_none());
        assert_eq!(problem["chapter_id"], CHAPTER);
        assert!(problem["type"].is_string());
    }

    // Body shapes survive the round trip: structured object and bare string.
    assert!(problems[0]["body"].is_object());
    assert!(problems[0]["body"]["choices"].is_array());
    assert!(problems[1]["body"].is_string());
    assert_eq!(problems[2]["body"]["placeholder"], "Write a short paragraph");
}

#[tokio::test]
async fn listing_requires_authentication() {
    let (app, _store) = create_test_app();

    let response = get(&app, &format!("/api/v1/chapters/{}/problems", CHAPTER), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_rejects_invalid_token() {
    let (app, _store) = create_test_app();

    let response = get(
        &app,
        &format!("/api/v1/chapters/{}/problems", CHAPTER),
        Some("garbage"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_requires_entitlement() {
    let (app, _store) = create_test_app();
    let token = auth_token("learner-2");

    let response = get(
        &app,
        &format!("/api/v1/chapters/{}/problems", CHAPTER),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "not_entitled");
}

#[tokio::test]
async fn listing_surfaces_load_failure() {
    let (app, store) = create_test_app();
    let token = auth_token(LEARNER);
    store.fail_listing(true);

    let response = get(
        &app,
        &format!("/api/v1/chapters/{}/problems", CHAPTER),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "load_failed");
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn empty_chapter_lists_no_problems() {
    let (app, store) = create_test_app();
    let token = auth_token(LEARNER);
    store.grant_entitlement(LEARNER, 2);

    let response = get(&app, "/api/v1/chapters/2/problems", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["problems"].as_array().unwrap().len(), 0);
}
