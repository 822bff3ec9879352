// ABOUTME: Workout route handlers for create, list, fetch, replace, and delete
// ABOUTME: Mutations return only after the persisted progress summary has been refreshed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fitgoal_core::errors::AppError;
use fitgoal_core::models::{WorkoutFilter, WorkoutInput};

use super::{json_body, parse_id, query_params};
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::services::workouts;

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workout", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/workout/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle POST /workout
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<WorkoutInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let input = json_body(payload)?;
        let workout = workouts::create_workout(&resources, auth.user_id, input).await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle GET /workout
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<WorkoutFilter>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let filter = query_params(query)?;
        let records = workouts::list_workouts(&resources, auth.user_id, &filter).await?;
        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Handle GET /workout/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let workout_id = parse_id(&id, "Workout")?;
        let workout = workouts::get_workout(&resources, auth.user_id, workout_id).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle PUT /workout/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        payload: Result<Json<WorkoutInput>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let workout_id = parse_id(&id, "Workout")?;
        let input = json_body(payload)?;
        let workout = workouts::update_workout(&resources, auth.user_id, workout_id, input).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /workout/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let workout_id = parse_id(&id, "Workout")?;
        workouts::delete_workout(&resources, auth.user_id, workout_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
