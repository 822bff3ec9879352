// ABOUTME: Workout record model, create/update input, and list filter
// ABOUTME: Input validation for workout fields happens here at the creation boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::limits::{
    MAX_WORKOUT_CALORIES, MAX_WORKOUT_DURATION_MINUTES, MAX_WORKOUT_NAME_LENGTH,
    MAX_WORKOUT_NOTES_LENGTH, MAX_WORKOUT_TYPE_LENGTH,
};
use crate::errors::{AppError, AppResult, ErrorCode};

/// A single logged exercise session owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Unique workout identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Goal this workout was explicitly logged against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
    /// Display name
    pub name: String,
    /// Free-form type label (running, cycling, ...)
    pub workout_type: String,
    /// Calendar day the workout happened on
    pub date: NaiveDate,
    /// Duration in minutes
    pub duration_minutes: i64,
    /// Energy spent in kcal
    pub calories_burned: i64,
    /// Optional free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Insert time
    pub created_at: DateTime<Utc>,
}

impl WorkoutRecord {
    /// Build a new record for `user_id` from validated input
    #[must_use]
    pub fn from_input(user_id: Uuid, input: WorkoutInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            goal_id: input.goal_id,
            name: input.name,
            workout_type: input.workout_type,
            date: input.date,
            duration_minutes: input.duration_minutes,
            calories_burned: input.calories_burned,
            notes: input.notes,
            created_at: Utc::now(),
        }
    }

    /// Replace every mutable field with the values from `input`
    pub fn apply(&mut self, input: WorkoutInput) {
        self.goal_id = input.goal_id;
        self.name = input.name;
        self.workout_type = input.workout_type;
        self.date = input.date;
        self.duration_minutes = input.duration_minutes;
        self.calories_burned = input.calories_burned;
        self.notes = input.notes;
    }
}

/// Request body for creating or replacing a workout
///
/// Field aliases accept the `workout_*` naming used by older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutInput {
    /// Display name
    #[serde(alias = "workout_name")]
    pub name: String,
    /// Free-form type label
    pub workout_type: String,
    /// Calendar day
    #[serde(alias = "workout_date")]
    pub date: NaiveDate,
    /// Duration in minutes
    #[serde(alias = "workout_duration")]
    pub duration_minutes: i64,
    /// Energy spent in kcal
    pub calories_burned: i64,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional goal to log against
    #[serde(default)]
    pub goal_id: Option<Uuid>,
}

impl WorkoutInput {
    /// Check field constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `ValueOutOfRange` naming the first bad field.
    pub fn validate(&self) -> AppResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "name must not be empty",
            ));
        }
        if name.chars().count() > MAX_WORKOUT_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "name must be at most {MAX_WORKOUT_NAME_LENGTH} characters"
            )));
        }

        let workout_type = self.workout_type.trim();
        if workout_type.is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "workout_type must not be empty",
            ));
        }
        if workout_type.chars().count() > MAX_WORKOUT_TYPE_LENGTH {
            return Err(AppError::invalid_input(format!(
                "workout_type must be at most {MAX_WORKOUT_TYPE_LENGTH} characters"
            )));
        }

        if self.duration_minutes <= 0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "duration_minutes must be greater than 0",
            ));
        }
        if self.duration_minutes > MAX_WORKOUT_DURATION_MINUTES {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!("duration_minutes must be at most {MAX_WORKOUT_DURATION_MINUTES}"),
            ));
        }
        if self.calories_burned <= 0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "calories_burned must be greater than 0",
            ));
        }
        if self.calories_burned > MAX_WORKOUT_CALORIES {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!("calories_burned must be at most {MAX_WORKOUT_CALORIES}"),
            ));
        }

        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_WORKOUT_NOTES_LENGTH {
                return Err(AppError::invalid_input(format!(
                    "notes must be at most {MAX_WORKOUT_NOTES_LENGTH} characters"
                )));
            }
        }

        Ok(())
    }
}

/// Optional narrowing of a user's workout list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WorkoutFilter {
    /// Only workouts logged against this goal
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    /// Inclusive lower date bound
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl WorkoutFilter {
    /// Filter that matches every workout
    #[must_use]
    pub const fn all() -> Self {
        Self {
            goal_id: None,
            from: None,
            to: None,
        }
    }

    /// Whether `from` comes after `to`
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}
