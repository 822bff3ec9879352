// ABOUTME: Progress aggregation over a user's workouts and goals
// ABOUTME: Computes per-goal progress and the per-user overall summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Progress aggregation.
//!
//! The aggregator never fails. Empty input yields a zeroed result and
//! negative calorie values are summed as given; validation belongs to the
//! record-creation boundary. Sums and differences saturate at the `i64`
//! bounds.
//!
//! A workout counts toward a goal when it was logged against that goal
//! (`goal_id` matches), or when it was logged against no goal and its
//! workout type matches the goal's type case-insensitively.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use fitgoal_core::constants::limits::RECENT_WORKOUTS_LIMIT;
use fitgoal_core::models::{
    Goal, GoalProgress, OverallSummary, WorkoutRecord, WorkoutTypeBreakdown,
};
use uuid::Uuid;

/// Whether `workout` counts toward `goal`
#[must_use]
pub fn counts_toward(goal: &Goal, workout: &WorkoutRecord) -> bool {
    match workout.goal_id {
        Some(goal_id) => goal_id == goal.id,
        None => same_type(&workout.workout_type, &goal.workout_type),
    }
}

fn same_type(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Per-goal progress using the default settings
///
/// `workouts` must already be scoped to the goal; see [`counts_toward`].
#[must_use]
pub fn aggregate(goal: &Goal, workouts: &[WorkoutRecord]) -> GoalProgress {
    ProgressAggregator::default().goal_progress(goal, workouts)
}

/// Per-user overall summary using the default settings
#[must_use]
pub fn aggregate_overall(
    user_id: Uuid,
    goals: &[Goal],
    workouts: &[WorkoutRecord],
) -> OverallSummary {
    ProgressAggregator::default().overall(user_id, goals, workouts)
}

/// Progress aggregation with a configurable recent-workout window
#[derive(Debug, Clone, Copy)]
pub struct ProgressAggregator {
    recent_limit: usize,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self {
            recent_limit: RECENT_WORKOUTS_LIMIT,
        }
    }
}

impl ProgressAggregator {
    /// Aggregator returning at most `recent_limit` recent workouts
    #[must_use]
    pub const fn with_recent_limit(recent_limit: usize) -> Self {
        Self { recent_limit }
    }

    /// Progress of `goal` given the workouts that count toward it
    #[must_use]
    pub fn goal_progress(&self, goal: &Goal, workouts: &[WorkoutRecord]) -> GoalProgress {
        let totals = Totals::from_workouts(workouts);
        let remaining_calories = goal.calories_to_burn.saturating_sub(totals.calories).max(0);

        GoalProgress {
            goal: goal.clone(),
            workout_count: totals.count,
            total_calories_burned: totals.calories,
            total_duration_minutes: totals.minutes,
            remaining_calories,
            progress_percentage: percentage(totals.calories, goal.calories_to_burn),
            days_elapsed: totals.active_days,
            days_remaining: goal.duration_days.saturating_sub(totals.active_days).max(0),
            daily_average_burned: totals.daily_average(),
            is_on_track: totals.meets_daily_target(goal.daily_target_calories),
            is_completed: goal.calories_to_burn > 0 && totals.calories >= goal.calories_to_burn,
            daily_trend: daily_trend(workouts),
            recent_workouts: self.recent(workouts),
        }
    }

    /// Progress of every goal, each against the workouts that count toward it
    #[must_use]
    pub fn all_goal_progress(
        &self,
        goals: &[Goal],
        workouts: &[WorkoutRecord],
    ) -> Vec<GoalProgress> {
        goals
            .iter()
            .map(|goal| self.goal_progress(goal, &scoped(goal, workouts)))
            .collect()
    }

    /// Overall summary across all of a user's goals and workouts
    #[must_use]
    pub fn overall(
        &self,
        user_id: Uuid,
        goals: &[Goal],
        workouts: &[WorkoutRecord],
    ) -> OverallSummary {
        let totals = Totals::from_workouts(workouts);

        let target_calories = saturating_total(goals.iter().map(|g| g.calories_to_burn));
        let target_duration_minutes = saturating_total(goals.iter().map(|g| g.daily_time_minutes));
        let completed_goals = goals
            .iter()
            .filter(|goal| {
                let burned = saturating_total(
                    workouts
                        .iter()
                        .filter(|w| counts_toward(goal, w))
                        .map(|w| w.calories_burned),
                );
                burned >= goal.calories_to_burn
            })
            .count();
        let completed_goals = count_i64(completed_goals);
        let total_goals = count_i64(goals.len());

        OverallSummary {
            user_id,
            total_workouts: totals.count,
            total_calories_burned: totals.calories,
            total_duration_minutes: totals.minutes,
            average_duration: per_workout(totals.minutes, totals.count),
            average_calories_burned: per_workout(totals.calories, totals.count),
            days_active: totals.active_days,
            daily_average_burned: totals.daily_average(),
            target_calories,
            remaining_calories: target_calories.saturating_sub(totals.calories).max(0),
            target_duration_minutes,
            remaining_duration_minutes: target_duration_minutes
                .saturating_sub(totals.minutes)
                .max(0),
            progress_percentage: percentage(totals.calories, target_calories),
            total_goals,
            active_goals: total_goals - completed_goals,
            completed_goals,
            by_workout_type: breakdown_by_type(workouts),
            daily_trend: daily_trend(workouts),
            recent_workouts: self.recent(workouts),
        }
    }

    /// Newest first; workouts on the same date keep their input order
    fn recent(&self, workouts: &[WorkoutRecord]) -> Vec<WorkoutRecord> {
        let mut sorted: Vec<&WorkoutRecord> = workouts.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
            .into_iter()
            .take(self.recent_limit)
            .cloned()
            .collect()
    }
}

/// Workouts that count toward `goal`, in input order
#[must_use]
pub fn scoped(goal: &Goal, workouts: &[WorkoutRecord]) -> Vec<WorkoutRecord> {
    workouts
        .iter()
        .filter(|w| counts_toward(goal, w))
        .cloned()
        .collect()
}

struct Totals {
    count: i64,
    calories: i64,
    minutes: i64,
    active_days: i64,
}

impl Totals {
    fn from_workouts(workouts: &[WorkoutRecord]) -> Self {
        let days: HashSet<NaiveDate> = workouts.iter().map(|w| w.date).collect();
        Self {
            count: count_i64(workouts.len()),
            calories: saturating_total(workouts.iter().map(|w| w.calories_burned)),
            minutes: saturating_total(workouts.iter().map(|w| w.duration_minutes)),
            active_days: count_i64(days.len()),
        }
    }

    fn daily_average(&self) -> f64 {
        if self.active_days > 0 {
            round_one(self.calories as f64 / self.active_days as f64)
        } else {
            0.0
        }
    }

    /// No active days means no evidence of falling behind
    fn meets_daily_target(&self, daily_target: i64) -> bool {
        if self.active_days > 0 {
            self.calories as f64 / self.active_days as f64 >= daily_target as f64
        } else {
            true
        }
    }
}

fn saturating_total(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

fn count_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn percentage(burned: i64, target: i64) -> f64 {
    if target > 0 {
        round_one(burned as f64 / target as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn per_workout(total: i64, count: i64) -> f64 {
    if count > 0 {
        round_one(total as f64 / count as f64)
    } else {
        0.0
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn daily_trend(workouts: &[WorkoutRecord]) -> BTreeMap<String, i64> {
    workouts.iter().fold(BTreeMap::new(), |mut trend, w| {
        let day = trend.entry(w.date.format("%Y-%m-%d").to_string()).or_insert(0);
        *day = day.saturating_add(w.calories_burned);
        trend
    })
}

fn breakdown_by_type(workouts: &[WorkoutRecord]) -> BTreeMap<String, WorkoutTypeBreakdown> {
    workouts.iter().fold(BTreeMap::new(), |mut by_type, w| {
        let entry: &mut WorkoutTypeBreakdown = by_type
            .entry(w.workout_type.trim().to_lowercase())
            .or_default();
        entry.count += 1;
        entry.total_calories = entry.total_calories.saturating_add(w.calories_burned);
        entry.total_minutes = entry.total_minutes.saturating_add(w.duration_minutes);
        by_type
    })
}
