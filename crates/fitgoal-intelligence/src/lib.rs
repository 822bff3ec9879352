// ABOUTME: Goal parsing and progress aggregation engine for fitgoal
// ABOUTME: Turns planner text into goal candidates and workouts into progress summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fitgoal Intelligence
//!
//! Both halves of this crate are synchronous and allocation-only: callers
//! fetch records from the store first and hand them over as slices.
//!
//! - [`goal_parser`]: extract a structured goal from free-form planner output
//! - [`progress`]: per-goal and per-user progress aggregation

/// Structured goal extraction from planner responses
pub mod goal_parser;

/// Progress aggregation over workouts and goals
pub mod progress;

pub use goal_parser::{parse_goal, GoalParseError};
pub use progress::{aggregate, aggregate_overall, counts_toward, scoped, ProgressAggregator};
