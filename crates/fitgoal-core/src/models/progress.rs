// ABOUTME: Derived progress summaries computed from workouts and goals
// ABOUTME: Per-goal progress, per-user overall summary, and the persisted summary row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Goal, WorkoutRecord};

/// Progress of one goal against the workouts that count toward it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// The goal being measured
    pub goal: Goal,
    /// Number of workouts counted
    pub workout_count: i64,
    /// Sum of `calories_burned`
    pub total_calories_burned: i64,
    /// Sum of `duration_minutes`
    pub total_duration_minutes: i64,
    /// `max(0, calories_to_burn - total_calories_burned)`
    pub remaining_calories: i64,
    /// Percent of the calorie target reached, one decimal, within [0, 100]
    pub progress_percentage: f64,
    /// Distinct calendar dates with at least one workout
    pub days_elapsed: i64,
    /// `max(0, duration_days - days_elapsed)`
    pub days_remaining: i64,
    /// kcal per active day, one decimal
    pub daily_average_burned: f64,
    /// Daily average meets the daily target, or no active days yet
    pub is_on_track: bool,
    /// Calorie target reached
    pub is_completed: bool,
    /// ISO date to kcal burned that day
    pub daily_trend: BTreeMap<String, i64>,
    /// Most recent workouts, newest first
    pub recent_workouts: Vec<WorkoutRecord>,
}

/// Totals for one workout type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutTypeBreakdown {
    /// Number of workouts of this type
    pub count: i64,
    /// kcal burned across them
    pub total_calories: i64,
    /// Minutes spent across them
    pub total_minutes: i64,
}

/// Aggregate across every workout and goal of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    /// Owner
    pub user_id: Uuid,
    /// Number of workouts
    pub total_workouts: i64,
    /// Sum of kcal across all workouts
    pub total_calories_burned: i64,
    /// Sum of minutes across all workouts
    pub total_duration_minutes: i64,
    /// Mean minutes per workout, one decimal
    pub average_duration: f64,
    /// Mean kcal per workout, one decimal
    pub average_calories_burned: f64,
    /// Distinct calendar dates with at least one workout
    pub days_active: i64,
    /// kcal per active day, one decimal
    pub daily_average_burned: f64,
    /// Sum of `calories_to_burn` across goals
    pub target_calories: i64,
    /// `max(0, target_calories - total_calories_burned)`
    pub remaining_calories: i64,
    /// Sum of `daily_time_minutes` across goals
    pub target_duration_minutes: i64,
    /// `max(0, target_duration_minutes - total_duration_minutes)`
    pub remaining_duration_minutes: i64,
    /// Percent of `target_calories` reached, one decimal, within [0, 100]
    pub progress_percentage: f64,
    /// Number of goals
    pub total_goals: i64,
    /// Goals whose target is not yet met
    pub active_goals: i64,
    /// Goals whose counted workouts meet or exceed the target
    pub completed_goals: i64,
    /// Totals keyed by lowercase workout type
    pub by_workout_type: BTreeMap<String, WorkoutTypeBreakdown>,
    /// ISO date to kcal burned that day
    pub daily_trend: BTreeMap<String, i64>,
    /// Most recent workouts, newest first
    pub recent_workouts: Vec<WorkoutRecord>,
}

impl OverallSummary {
    /// Zeroed summary for a user with nothing recorded
    #[must_use]
    pub const fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_workouts: 0,
            total_calories_burned: 0,
            total_duration_minutes: 0,
            average_duration: 0.0,
            average_calories_burned: 0.0,
            days_active: 0,
            daily_average_burned: 0.0,
            target_calories: 0,
            remaining_calories: 0,
            target_duration_minutes: 0,
            remaining_duration_minutes: 0,
            progress_percentage: 0.0,
            total_goals: 0,
            active_goals: 0,
            completed_goals: 0,
            by_workout_type: BTreeMap::new(),
            daily_trend: BTreeMap::new(),
            recent_workouts: Vec::new(),
        }
    }
}

/// Cached copy of the last computed [`OverallSummary`], one row per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSummary {
    /// Owner and primary key
    pub user_id: Uuid,
    /// Summary as of `updated_at`
    pub summary: OverallSummary,
    /// Time of the refresh that wrote this row
    pub updated_at: DateTime<Utc>,
}
