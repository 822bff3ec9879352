// ABOUTME: Route module organization for fitgoal HTTP endpoints
// ABOUTME: Each domain module holds route definitions and thin handlers over the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes, grouped by domain.
//!
//! Handlers authenticate, extract, call one service function, and render.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use fitgoal_core::errors::AppError;
use uuid::Uuid;

/// Registration and token issuance
pub mod auth;
/// Goal creation and lookup
pub mod goals;
/// Health and readiness probes
pub mod health;
/// Progress aggregates and the persisted summary
pub mod progress;
/// Workout CRUD
pub mod workouts;

pub use auth::AuthRoutes;
pub use goals::GoalRoutes;
pub use health::HealthRoutes;
pub use progress::ProgressRoutes;
pub use workouts::WorkoutRoutes;

/// Parse a path id; anything that is not a UUID names no stored resource
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::not_found(resource).with_resource_id(raw.to_owned()))
}

/// Unwrap a JSON body, turning a rejection into an `InvalidInput` error
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::invalid_input(format!("Invalid JSON body: {}", e.body_text())))
}

/// Unwrap a query string, turning a rejection into an `InvalidInput` error
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::invalid_input(format!("Invalid query string: {}", e.body_text())))
}
