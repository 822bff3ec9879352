// ABOUTME: Progress route handlers for per-goal aggregates and the overall summary
// ABOUTME: Live aggregates are computed per request; the persisted summary is read or refreshed explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fitgoal_core::errors::AppError;

use super::parse_id;
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::services::progress;

/// Progress routes handler
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    ///
    /// The static `/progress/summary` paths take precedence over
    /// `/progress/:goal_id`.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/progress", get(Self::handle_all_goals))
            .route("/progress/summary", get(Self::handle_summary))
            .route(
                "/progress/summary/persisted",
                get(Self::handle_persisted_summary),
            )
            .route("/progress/summary/refresh", post(Self::handle_refresh))
            .route("/progress/:goal_id", get(Self::handle_goal))
            .route("/workout-summary", get(Self::handle_refresh))
            .with_state(resources)
    }

    /// Handle GET /progress
    async fn handle_all_goals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let all = progress::all_goal_progress(&resources, auth.user_id).await?;
        Ok((StatusCode::OK, Json(all)).into_response())
    }

    /// Handle GET /progress/:goal_id
    async fn handle_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(goal_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal_id = parse_id(&goal_id, "Goal")?;
        let one = progress::goal_progress(&resources, auth.user_id, goal_id).await?;
        Ok((StatusCode::OK, Json(one)).into_response())
    }

    /// Handle GET /progress/summary
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let summary = progress::overall_summary(&resources, auth.user_id).await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    /// Handle GET /progress/summary/persisted
    async fn handle_persisted_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let persisted = progress::persisted_summary(&resources, auth.user_id).await?;
        Ok((StatusCode::OK, Json(persisted)).into_response())
    }

    /// Handle POST /progress/summary/refresh and GET /workout-summary
    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let persisted = progress::refresh_summary(&resources, auth.user_id).await?;
        Ok((StatusCode::OK, Json(persisted.summary)).into_response())
    }
}
