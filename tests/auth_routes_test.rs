// ABOUTME: Integration tests for registration, token issuance, and bearer authentication
// ABOUTME: Drives the assembled router with tower oneshot against an in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{create_test_resources, create_test_user, ScriptedLlm, RUNNING_GOAL_JSON, TEST_PASSWORD};
use fitgoal_server::server::build_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::post("/register")
        .json(&json!({"email": "  Runner@Example.com ", "password": TEST_PASSWORD}))
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json_value();
    assert_eq!(body["email"], "runner@example.com");
    assert!(body["message"].is_string());

    let response = AxumTestRequest::post("/token")
        .json(&json!({"email": "runner@example.com", "password": TEST_PASSWORD}))
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_with_form_body() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    create_test_user(&resources, "form@example.com").await.unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::post("/token")
        .form(&format!("username=form%40example.com&password={TEST_PASSWORD}"))
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    create_test_user(&resources, "taken@example.com").await.unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::post("/register")
        .json(&json!({"email": "TAKEN@example.com", "password": TEST_PASSWORD}))
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json_value()["error"]["message"],
        "Email already registered"
    );
}

#[tokio::test]
async fn test_weak_registration_rejected() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::post("/register")
        .json(&json!({"email": "not-an-email", "password": TEST_PASSWORD}))
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = AxumTestRequest::post("/register")
        .json(&json!({"email": "short@example.com", "password": "abc"}))
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    create_test_user(&resources, "known@example.com").await.unwrap();
    let app = build_router(resources);

    for (email, password) in [
        ("known@example.com", "wrong-password"),
        ("unknown@example.com", TEST_PASSWORD),
    ] {
        let response = AxumTestRequest::post("/token")
            .json(&json!({"email": email, "password": password}))
            .send(app.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json_value()["error"]["message"],
            "Incorrect email or password"
        );
    }
}

#[tokio::test]
async fn test_protected_route_requires_valid_token() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get("/workout").send(app.clone()).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json_value()["error"]["message"],
        "Could not validate credentials"
    );

    let response = AxumTestRequest::get("/workout")
        .bearer("not.a.jwt")
        .header("x-request-id", "trace-42")
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-request-id"], "trace-42");
    assert_eq!(response.json_value()["error"]["request_id"], "trace-42");
}

#[tokio::test]
async fn test_expired_token_is_reported() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let user = create_test_user(&resources, "late@example.com").await.unwrap();
    let issued = resources
        .auth_manager
        .generate_token_at(&user, Utc::now() - Duration::hours(2))
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get("/progress/summary")
        .bearer(&issued.access_token)
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json_value()["error"]["message"], "Token has expired");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "trace-me-123")
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-123"
    );

    let response = AxumTestRequest::get("/health").send(app).await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_ready_pings_store() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let app = build_router(resources);

    let response = AxumTestRequest::get("/ready").send(app).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json_value()["status"], "ready");
}
