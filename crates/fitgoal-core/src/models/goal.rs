// ABOUTME: Goal model and the structured goal candidate produced by the goal planner
// ABOUTME: Candidate validation enforces positive targets and goal name length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits::{
    MAX_DAILY_TARGET_CALORIES, MAX_DAILY_TIME_MINUTES, MAX_GOAL_CALORIES,
    MAX_GOAL_DURATION_DAYS, MAX_GOAL_NAME_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// A calorie/workout target with a duration window
///
/// Goals are created once from a planner response and never updated.
/// `goal_name` is unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique goal identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Globally unique display name
    pub goal_name: String,
    /// Workout type counted toward this goal
    pub workout_type: String,
    /// Total kcal to burn over the window
    pub calories_to_burn: i64,
    /// Daily kcal target
    pub daily_target_calories: i64,
    /// Daily minutes target
    pub daily_time_minutes: i64,
    /// Length of the window in days
    pub duration_days: i64,
    /// Insert time
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Materialize a validated candidate as a goal owned by `user_id`
    #[must_use]
    pub fn from_candidate(user_id: Uuid, candidate: GoalCandidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            goal_name: candidate.goal_name,
            workout_type: candidate.workout_type,
            calories_to_burn: candidate.calories_to_burn,
            daily_target_calories: candidate.daily_target_calories,
            daily_time_minutes: candidate.daily_time_minutes,
            duration_days: candidate.duration_days,
            created_at: Utc::now(),
        }
    }
}

/// The six fields a planner response must carry, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalCandidate {
    /// Proposed goal name
    pub goal_name: String,
    /// Proposed workout type
    pub workout_type: String,
    /// Total kcal to burn
    pub calories_to_burn: i64,
    /// Window length in days
    pub duration_days: i64,
    /// Daily kcal target
    pub daily_target_calories: i64,
    /// Daily minutes target
    pub daily_time_minutes: i64,
}

impl GoalCandidate {
    /// Check field constraints
    ///
    /// # Errors
    ///
    /// Returns an `UnprocessableResponse` error when a name is empty or too
    /// long, or when any numeric target is not strictly positive or exceeds
    /// its limit.
    pub fn validate(&self) -> AppResult<()> {
        let name = self.goal_name.trim();
        if name.is_empty() {
            return Err(AppError::unprocessable("goal_name must not be empty"));
        }
        if name.chars().count() > MAX_GOAL_NAME_LENGTH {
            return Err(AppError::unprocessable(format!(
                "goal_name must be at most {MAX_GOAL_NAME_LENGTH} characters"
            )));
        }
        if self.workout_type.trim().is_empty() {
            return Err(AppError::unprocessable("workout_type must not be empty"));
        }

        let numbers = [
            ("calories_to_burn", self.calories_to_burn, MAX_GOAL_CALORIES),
            ("duration_days", self.duration_days, MAX_GOAL_DURATION_DAYS),
            (
                "daily_target_calories",
                self.daily_target_calories,
                MAX_DAILY_TARGET_CALORIES,
            ),
            (
                "daily_time_minutes",
                self.daily_time_minutes,
                MAX_DAILY_TIME_MINUTES,
            ),
        ];
        for (field, value, max) in numbers {
            if value <= 0 {
                return Err(AppError::unprocessable(format!(
                    "{field} must be greater than 0, got {value}"
                )));
            }
            if value > max {
                return Err(AppError::unprocessable(format!(
                    "{field} must be at most {max}, got {value}"
                )));
            }
        }

        Ok(())
    }
}
