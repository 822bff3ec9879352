// ABOUTME: Integration tests for goal creation through the scripted goal planner
// ABOUTME: Covers clean and prose-wrapped replies, parse failures, upstream failures, and duplicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    bearer_token, create_test_resources, create_test_user, ScriptedLlm, RUNNING_GOAL_JSON,
};
use fitgoal_server::errors::ErrorCode;
use fitgoal_server::models::Goal;
use fitgoal_server::server::build_router;
use fitgoal_server::services::goals;
use futures_util::future::join_all;
use helpers::axum_test::AxumTestRequest;

const GOAL_QUERY: &str = "/goal?goal=I%20want%20to%20lose%202kg%20running%20in%20a%20month";

#[tokio::test]
async fn test_create_goal_from_clean_reply() {
    let llm = ScriptedLlm::replying(RUNNING_GOAL_JSON);
    let resources = create_test_resources(llm.clone()).await.unwrap();
    let user = create_test_user(&resources, "goal@example.com").await.unwrap();
    let token = bearer_token(&resources, &user);
    let app = build_router(resources);

    let response = AxumTestRequest::post(GOAL_QUERY)
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let goal: Goal = response.json();
    assert_eq!(goal.goal_name, "Lose 2kg running");
    assert_eq!(goal.user_id, user.id);
    assert_eq!(goal.daily_target_calories, 700);
    assert_eq!(llm.calls(), 1);

    let response = AxumTestRequest::get(&format!("/goal/{}", goal.id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get("/goal").bearer(&token).send(app).await;
    let listed: Vec<Goal> = response.json();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_create_goal_from_prose_reply() {
    let reply = format!(
        "Sure! Here is a plan for you:\n```json\n{RUNNING_GOAL_JSON}\n```\nGood luck {{:}}"
    );
    let resources = create_test_resources(ScriptedLlm::replying(&reply))
        .await
        .unwrap();
    let user = create_test_user(&resources, "prose@example.com").await.unwrap();

    let goal = goals::create_goal(&resources, user.id, "lose 2kg running")
        .await
        .unwrap();
    assert_eq!(goal.workout_type, "running");
    assert_eq!(goal.calories_to_burn, 15_400);
}

#[tokio::test]
async fn test_unparseable_reply_is_unprocessable() {
    let resources = create_test_resources(ScriptedLlm::replying("I cannot help with that."))
        .await
        .unwrap();
    let user = create_test_user(&resources, "nope@example.com").await.unwrap();
    let token = bearer_token(&resources, &user);
    let database = Arc::clone(&resources.database);
    let app = build_router(resources);

    let response = AxumTestRequest::post(GOAL_QUERY).bearer(&token).send(app).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let message = response.json_value()["error"]["message"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(message.starts_with("Invalid response from AI"));
    assert!(response.json_value()["error"]["details"]["required_fields"].is_array());
    assert!(response.json_value()["error"]["request_id"].is_string());
    assert!(database.list_goals(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_positive_target_is_unprocessable() {
    let reply = RUNNING_GOAL_JSON.replace("\"duration_days\": 30", "\"duration_days\": 0");
    let resources = create_test_resources(ScriptedLlm::replying(&reply))
        .await
        .unwrap();
    let user = create_test_user(&resources, "zero@example.com").await.unwrap();

    let error = goals::create_goal(&resources, user.id, "something")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::UnprocessableResponse);
    assert!(resources.database.list_goals(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_planner_outage_is_service_unavailable() {
    let llm = ScriptedLlm::failing(
        ErrorCode::ExternalServiceUnavailable,
        "Failed to communicate with AI service",
    );
    let resources = create_test_resources(llm).await.unwrap();
    let user = create_test_user(&resources, "down@example.com").await.unwrap();
    let token = bearer_token(&resources, &user);
    let app = build_router(resources);

    let response = AxumTestRequest::post(GOAL_QUERY).bearer(&token).send(app).await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json_value()["error"]["message"],
        "Failed to communicate with AI service"
    );
}

#[tokio::test]
async fn test_empty_description_rejected_without_planner_call() {
    let llm = ScriptedLlm::replying(RUNNING_GOAL_JSON);
    let resources = create_test_resources(llm.clone()).await.unwrap();
    let user = create_test_user(&resources, "empty@example.com").await.unwrap();
    let token = bearer_token(&resources, &user);
    let app = build_router(resources);

    let response = AxumTestRequest::post("/goal?goal=%20%20")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_duplicate_goal_name_rejected() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let user = create_test_user(&resources, "dup@example.com").await.unwrap();
    let token = bearer_token(&resources, &user);
    let app = build_router(resources);

    let first = AxumTestRequest::post(GOAL_QUERY)
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = AxumTestRequest::post(GOAL_QUERY).bearer(&token).send(app).await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        second.json_value()["error"]["message"],
        "Your goal already exists"
    );
}

#[tokio::test]
async fn test_concurrent_duplicates_create_exactly_one() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let user = create_test_user(&resources, "race@example.com").await.unwrap();

    let user_id = user.id;
    let mut attempts = Vec::new();
    for _ in 0..4 {
        let resources = resources.clone();
        attempts.push(tokio::spawn(async move {
            goals::create_goal(&resources, user_id, "same goal").await
        }));
    }
    let results = join_all(attempts).await;

    let created = results
        .iter()
        .filter(|joined| joined.as_ref().is_ok_and(Result::is_ok))
        .count();
    assert_eq!(created, 1);
    for joined in results {
        if let Err(e) = joined.unwrap() {
            assert_eq!(e.code, ErrorCode::ResourceAlreadyExists);
        }
    }
    assert_eq!(resources.database.list_goals(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_goal_creation_leaves_summary_untouched() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let user = create_test_user(&resources, "quiet@example.com").await.unwrap();

    goals::create_goal(&resources, user.id, "lose weight").await.unwrap();
    assert!(resources.database.get_summary(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_other_users_goal_is_not_found() {
    let resources = create_test_resources(ScriptedLlm::replying(RUNNING_GOAL_JSON))
        .await
        .unwrap();
    let owner = create_test_user(&resources, "owner@example.com").await.unwrap();
    let other = create_test_user(&resources, "other@example.com").await.unwrap();
    let goal = goals::create_goal(&resources, owner.id, "run").await.unwrap();
    let token = bearer_token(&resources, &other);
    let app = build_router(resources);

    let response = AxumTestRequest::get(&format!("/goal/{}", goal.id))
        .bearer(&token)
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = AxumTestRequest::get("/goal/not-a-uuid")
        .bearer(&token)
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
