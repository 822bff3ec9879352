// ABOUTME: Domain service layer for business logic called by route handlers
// ABOUTME: Accounts, goal creation, workout mutations, and progress summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Handlers authenticate and deserialize; everything else happens here so the
//! rules are testable without HTTP.

/// Registration and login
pub mod accounts;

/// Goal creation pipeline: planner call, parse, validate, uniqueness, insert
pub mod goals;

/// Progress queries and the persisted summary refresh
pub mod progress;

/// Workout CRUD with summary refresh after every mutation
pub mod workouts;
