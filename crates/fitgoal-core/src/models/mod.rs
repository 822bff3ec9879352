// ABOUTME: Core data models for the fitgoal tracking service
// ABOUTME: Re-exports user, workout, goal and progress summary types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Rows from the relational store are converted into these structs at the
//! store boundary; nothing past that boundary handles loosely typed maps.

mod goal;
mod progress;
mod user;
mod workout;

pub use goal::{Goal, GoalCandidate};
pub use progress::{GoalProgress, OverallSummary, PersistedSummary, WorkoutTypeBreakdown};
pub use user::User;
pub use workout::{WorkoutFilter, WorkoutInput, WorkoutRecord};
