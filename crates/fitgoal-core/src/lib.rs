// ABOUTME: Core types and constants for the fitgoal tracking service
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fitgoal Core
//!
//! Shared types for the fitgoal workspace. The server crate and the
//! intelligence crate both depend on this one, so it changes rarely.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the HTTP error envelope
//! - **constants**: field limits and goal schema keys
//! - **models**: users, workouts, goals and progress summaries

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (User, `WorkoutRecord`, Goal, progress summaries)
pub mod models;
