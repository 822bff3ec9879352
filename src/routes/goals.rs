// ABOUTME: Goal route handlers: create from free text, list, and fetch one
// ABOUTME: POST /goal?goal=<text> drives the planner pipeline in services::goals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fitgoal_core::errors::AppError;
use serde::Deserialize;

use super::{parse_id, query_params};
use crate::middleware::authenticate;
use crate::resources::ServerResources;
use crate::services::goals;

/// Query string of `POST /goal`
#[derive(Debug, Default, Deserialize)]
pub struct CreateGoalQuery {
    /// Free-text goal description
    #[serde(default)]
    pub goal: String,
}

/// Goal routes handler
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/goal", get(Self::handle_list).post(Self::handle_create))
            .route("/goal/:id", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle POST /goal
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        query: Result<Query<CreateGoalQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let query = query_params(query)?;
        let goal = goals::create_goal(&resources, auth.user_id, &query.goal).await?;
        Ok((StatusCode::CREATED, Json(goal)).into_response())
    }

    /// Handle GET /goal
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goals = goals::list_goals(&resources, auth.user_id).await?;
        Ok((StatusCode::OK, Json(goals)).into_response())
    }

    /// Handle GET /goal/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal_id = parse_id(&id, "Goal")?;
        let goal = goals::get_goal(&resources, auth.user_id, goal_id).await?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }
}
