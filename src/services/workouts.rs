// ABOUTME: Workout CRUD scoped to the authenticated user
// ABOUTME: Every successful mutation is followed by a persisted progress summary refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout operations.
//!
//! A mutation that succeeds stays committed even when the summary refresh
//! after it fails; the caller then sees a 500 and the stored summary is
//! stale until the next successful refresh.

use fitgoal_core::errors::{AppError, AppResult};
use fitgoal_core::models::{WorkoutFilter, WorkoutInput, WorkoutRecord};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::progress::refresh_summary;
use crate::resources::ServerResources;

fn workout_not_found(workout_id: Uuid) -> AppError {
    AppError::not_found("Workout").with_resource_id(workout_id.to_string())
}

/// Reject a `goal_id` that does not name one of the user's goals
async fn ensure_goal_owned(
    resources: &ServerResources,
    user_id: Uuid,
    goal_id: Option<Uuid>,
) -> AppResult<()> {
    let Some(goal_id) = goal_id else {
        return Ok(());
    };
    match resources.database.get_goal(user_id, goal_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Goal").with_resource_id(goal_id.to_string())),
    }
}

async fn refresh_after_mutation(resources: &ServerResources, user_id: Uuid) -> AppResult<()> {
    refresh_summary(resources, user_id)
        .await
        .map(|_| ())
        .map_err(|e| {
            error!(user.id = %user_id, error = %e, "Summary refresh failed after workout mutation");
            AppError::internal(format!("Progress summary refresh failed: {}", e.message))
                .with_user_id(user_id)
                .with_source(e)
        })
}

/// Record a workout and refresh the user's summary
///
/// # Errors
///
/// Returns a validation error for bad input, `ResourceNotFound` for an
/// unknown `goal_id`, or `InternalError` when the refresh fails
#[instrument(skip(resources, input), fields(user_id = %user_id))]
pub async fn create_workout(
    resources: &ServerResources,
    user_id: Uuid,
    input: WorkoutInput,
) -> AppResult<WorkoutRecord> {
    input.validate()?;
    ensure_goal_owned(resources, user_id, input.goal_id).await?;

    let workout = WorkoutRecord::from_input(user_id, input);
    resources.database.create_workout(&workout).await?;
    info!(workout.id = %workout.id, "Workout recorded");

    refresh_after_mutation(resources, user_id).await?;
    Ok(workout)
}

/// One workout owned by the user
///
/// # Errors
///
/// Returns `ResourceNotFound` when it does not exist or is not the user's
pub async fn get_workout(
    resources: &ServerResources,
    user_id: Uuid,
    workout_id: Uuid,
) -> AppResult<WorkoutRecord> {
    resources
        .database
        .get_workout(user_id, workout_id)
        .await?
        .ok_or_else(|| workout_not_found(workout_id))
}

/// The user's workouts matching `filter`, oldest first
///
/// # Errors
///
/// Returns `InvalidInput` when `from` is after `to`
pub async fn list_workouts(
    resources: &ServerResources,
    user_id: Uuid,
    filter: &WorkoutFilter,
) -> AppResult<Vec<WorkoutRecord>> {
    if filter.is_inverted() {
        return Err(AppError::invalid_input("'from' must not be after 'to'"));
    }
    resources.database.list_workouts(user_id, filter).await
}

/// Replace a workout's fields and refresh the user's summary
///
/// # Errors
///
/// Same as [`create_workout`], plus `ResourceNotFound` for an unknown workout
#[instrument(skip(resources, input), fields(user_id = %user_id, workout_id = %workout_id))]
pub async fn update_workout(
    resources: &ServerResources,
    user_id: Uuid,
    workout_id: Uuid,
    input: WorkoutInput,
) -> AppResult<WorkoutRecord> {
    input.validate()?;
    let mut workout = get_workout(resources, user_id, workout_id).await?;
    ensure_goal_owned(resources, user_id, input.goal_id).await?;

    workout.apply(input);
    if !resources.database.update_workout(&workout).await? {
        return Err(workout_not_found(workout_id));
    }

    refresh_after_mutation(resources, user_id).await?;
    Ok(workout)
}

/// Delete a workout and refresh the user's summary
///
/// # Errors
///
/// Returns `ResourceNotFound` when no row was deleted, or `InternalError`
/// when the refresh fails
#[instrument(skip(resources), fields(user_id = %user_id, workout_id = %workout_id))]
pub async fn delete_workout(
    resources: &ServerResources,
    user_id: Uuid,
    workout_id: Uuid,
) -> AppResult<()> {
    if !resources.database.delete_workout(user_id, workout_id).await? {
        return Err(workout_not_found(workout_id));
    }
    info!("Workout deleted");

    refresh_after_mutation(resources, user_id).await
}
