// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Field limits, goal schema keys, and service defaults shared across crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Input length and count limits enforced at record-creation boundaries
pub mod limits {
    /// Maximum characters in a goal name
    pub const MAX_GOAL_NAME_LENGTH: usize = 100;
    /// Maximum characters in a workout name
    pub const MAX_WORKOUT_NAME_LENGTH: usize = 100;
    /// Maximum characters in workout notes
    pub const MAX_WORKOUT_NOTES_LENGTH: usize = 500;
    /// Maximum characters in a workout type label
    pub const MAX_WORKOUT_TYPE_LENGTH: usize = 50;
    /// Number of workouts returned in `recent_workouts`
    pub const RECENT_WORKOUTS_LIMIT: usize = 5;
    /// Minimum password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Maximum characters accepted in the free-text goal description
    pub const MAX_GOAL_PROMPT_LENGTH: usize = 1_000;
    /// Longest single workout, one day
    pub const MAX_WORKOUT_DURATION_MINUTES: i64 = 1_440;
    /// Most kcal a single workout may record
    pub const MAX_WORKOUT_CALORIES: i64 = 20_000;
    /// Largest total kcal target a goal may carry
    pub const MAX_GOAL_CALORIES: i64 = 10_000_000;
    /// Longest goal window, ten years
    pub const MAX_GOAL_DURATION_DAYS: i64 = 3_650;
    /// Largest daily kcal target
    pub const MAX_DAILY_TARGET_CALORIES: i64 = 20_000;
    /// Largest daily minutes target
    pub const MAX_DAILY_TIME_MINUTES: i64 = 1_440;
}

/// Keys of the structured goal object produced by the goal planner
pub mod goal_fields {
    /// Goal display name
    pub const GOAL_NAME: &str = "goal_name";
    /// Workout type the goal is about
    pub const WORKOUT_TYPE: &str = "workout_type";
    /// Total kcal target
    pub const CALORIES_TO_BURN: &str = "calories_to_burn";
    /// Goal window in days
    pub const DURATION_DAYS: &str = "duration_days";
    /// Daily kcal target
    pub const DAILY_TARGET_CALORIES: &str = "daily_target_calories";
    /// Daily minutes target
    pub const DAILY_TIME_MINUTES: &str = "daily_time_minutes";

    /// All keys a structured goal must carry
    pub const REQUIRED: [&str; 6] = [
        GOAL_NAME,
        WORKOUT_TYPE,
        CALORIES_TO_BURN,
        DURATION_DAYS,
        DAILY_TARGET_CALORIES,
        DAILY_TIME_MINUTES,
    ];
}

/// Service identity
pub mod service_names {
    /// Name used in logs and health responses
    pub const FITGOAL_SERVER: &str = "fitgoal-server";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}
