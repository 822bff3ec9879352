// ABOUTME: Progress queries and the write-through persisted summary refresh
// ABOUTME: Reads goals and workouts, aggregates with fitgoal-intelligence, upserts one row per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Progress summaries
//!
//! [`refresh_summary`] is three independent store operations (read goals,
//! read workouts, upsert) with no surrounding transaction. Concurrent
//! refreshes for one user race and the last upsert wins.

use std::time::Instant;

use chrono::Utc;
use fitgoal_core::errors::{AppError, AppResult};
use fitgoal_core::models::{
    Goal, GoalProgress, OverallSummary, PersistedSummary, WorkoutFilter, WorkoutRecord,
};
use fitgoal_intelligence::scoped;
use tracing::instrument;
use uuid::Uuid;

use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Recompute the user's overall summary and store it
///
/// # Errors
///
/// Returns the store error from whichever step failed; nothing is written
/// unless both reads succeed
#[instrument(skip(resources), fields(user_id = %user_id))]
pub async fn refresh_summary(
    resources: &ServerResources,
    user_id: Uuid,
) -> AppResult<PersistedSummary> {
    let started = Instant::now();
    let summary = overall_summary(resources, user_id).await?;

    let persisted = PersistedSummary {
        user_id,
        summary,
        updated_at: Utc::now(),
    };
    resources
        .database
        .upsert_summary(&persisted)
        .await
        .map_err(|e| e.with_user_id(user_id))?;

    AppLogger::log_summary_refresh(
        &user_id.to_string(),
        persisted.summary.total_workouts,
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );
    Ok(persisted)
}

/// All goals and all workouts of one user
async fn load_history(
    resources: &ServerResources,
    user_id: Uuid,
) -> AppResult<(Vec<Goal>, Vec<WorkoutRecord>)> {
    let goals = resources.database.list_goals(user_id).await?;
    let workouts = resources
        .database
        .list_workouts(user_id, &WorkoutFilter::all())
        .await?;
    Ok((goals, workouts))
}

/// Compute the user's overall summary without persisting it
///
/// # Errors
///
/// Returns an error if reading goals or workouts fails
#[instrument(skip(resources), fields(user_id = %user_id))]
pub async fn overall_summary(
    resources: &ServerResources,
    user_id: Uuid,
) -> AppResult<OverallSummary> {
    let (goals, workouts) = load_history(resources, user_id)
        .await
        .map_err(|e| e.with_user_id(user_id))?;

    Ok(resources.aggregator.overall(user_id, &goals, &workouts))
}

/// Progress of every goal the user owns
///
/// # Errors
///
/// Returns an error if reading goals or workouts fails
#[instrument(skip(resources), fields(user_id = %user_id))]
pub async fn all_goal_progress(
    resources: &ServerResources,
    user_id: Uuid,
) -> AppResult<Vec<GoalProgress>> {
    let (goals, workouts) = load_history(resources, user_id)
        .await
        .map_err(|e| e.with_user_id(user_id))?;

    Ok(resources.aggregator.all_goal_progress(&goals, &workouts))
}

/// Progress of one goal
///
/// # Errors
///
/// Returns `ResourceNotFound` when the goal does not exist or belongs to
/// another user
#[instrument(skip(resources), fields(user_id = %user_id, goal_id = %goal_id))]
pub async fn goal_progress(
    resources: &ServerResources,
    user_id: Uuid,
    goal_id: Uuid,
) -> AppResult<GoalProgress> {
    let goal = resources
        .database
        .get_goal(user_id, goal_id)
        .await
        .map_err(|e| e.with_user_id(user_id))?
        .ok_or_else(|| AppError::not_found("Goal").with_resource_id(goal_id.to_string()))?;

    let workouts = resources
        .database
        .list_workouts(user_id, &WorkoutFilter::all())
        .await
        .map_err(|e| e.with_user_id(user_id).with_resource_id(goal_id.to_string()))?;
    let counted = scoped(&goal, &workouts);

    Ok(resources.aggregator.goal_progress(&goal, &counted))
}

/// The last stored summary
///
/// # Errors
///
/// Returns `ResourceNotFound` when no refresh has happened yet
#[instrument(skip(resources), fields(user_id = %user_id))]
pub async fn persisted_summary(
    resources: &ServerResources,
    user_id: Uuid,
) -> AppResult<PersistedSummary> {
    resources
        .database
        .get_summary(user_id)
        .await
        .map_err(|e| e.with_user_id(user_id))?
        .ok_or_else(|| AppError::not_found("Progress summary"))
}
