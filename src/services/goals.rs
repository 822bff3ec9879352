// ABOUTME: Goal creation from free-text descriptions via the goal planner
// ABOUTME: Prompt, parse, validate, enforce name uniqueness, then store the goal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use fitgoal_core::constants::limits::MAX_GOAL_PROMPT_LENGTH;
use fitgoal_core::errors::{AppError, AppResult, ErrorCode};
use fitgoal_core::models::Goal;
use fitgoal_intelligence::parse_goal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::llm::prompts::goal_planner_request;
use crate::logging::AppLogger;
use crate::resources::ServerResources;

const DUPLICATE_GOAL: &str = "Your goal already exists";

/// Turn a free-text description into a stored goal
///
/// The planner is called exactly once. Nothing is stored when any step
/// fails, and the persisted progress summary is left untouched.
///
/// # Errors
///
/// - `MissingRequiredField` / `InvalidInput` for an empty or oversized description
/// - `ExternalServiceUnavailable` / `ExternalServiceError` when the planner fails
/// - `UnprocessableResponse` when the reply has no usable goal
/// - `ResourceAlreadyExists` when a goal with the same name exists
#[instrument(skip(resources, description), fields(user_id = %user_id))]
pub async fn create_goal(
    resources: &ServerResources,
    user_id: Uuid,
    description: &str,
) -> AppResult<Goal> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::new(
            ErrorCode::MissingRequiredField,
            "Goal description must not be empty",
        ));
    }
    if description.chars().count() > MAX_GOAL_PROMPT_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Goal description must be at most {MAX_GOAL_PROMPT_LENGTH} characters"
        )));
    }

    let request = goal_planner_request(description);
    let started = Instant::now();
    let outcome = resources.llm.complete(&request).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    AppLogger::log_planner_call(
        &user_id.to_string(),
        resources.llm.default_model(),
        outcome.is_ok(),
        elapsed_ms,
    );
    let reply = outcome?;

    let candidate = parse_goal(&reply.content)?;
    candidate.validate()?;

    if resources
        .database
        .get_goal_by_name(&candidate.goal_name)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists(DUPLICATE_GOAL));
    }

    let goal = Goal::from_candidate(user_id, candidate);
    resources.database.create_goal(&goal).await.map_err(|e| {
        if e.code == ErrorCode::ResourceAlreadyExists {
            AppError::already_exists(DUPLICATE_GOAL)
        } else {
            e
        }
    })?;

    info!(goal.id = %goal.id, goal.name = %goal.goal_name, "Goal created");
    Ok(goal)
}

/// Goals owned by the user, oldest first
///
/// # Errors
///
/// Returns an error if the store read fails
pub async fn list_goals(resources: &ServerResources, user_id: Uuid) -> AppResult<Vec<Goal>> {
    resources.database.list_goals(user_id).await
}

/// One goal owned by the user
///
/// # Errors
///
/// Returns `ResourceNotFound` when the goal does not exist or belongs to
/// another user
pub async fn get_goal(
    resources: &ServerResources,
    user_id: Uuid,
    goal_id: Uuid,
) -> AppResult<Goal> {
    resources
        .database
        .get_goal(user_id, goal_id)
        .await?
        .ok_or_else(|| AppError::not_found("Goal").with_resource_id(goal_id.to_string()))
}
