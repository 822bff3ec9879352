// ABOUTME: Authentication route handlers for registration and token issuance
// ABOUTME: POST /register creates an account; POST /token exchanges credentials for a JWT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! `/token` accepts the credentials as JSON or as an
//! `application/x-www-form-urlencoded` body, where `username` is accepted
//! in place of `email`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use fitgoal_core::errors::AppError;
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::resources::ServerResources;
use crate::services::accounts;

/// Body of `POST /register`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Account email
    pub email: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Response to a successful registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Confirmation text
    pub message: String,
    /// Normalized email of the new account
    pub email: String,
}

/// Credentials for `POST /token`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    #[serde(alias = "username")]
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/register", post(Self::handle_register))
            .route("/token", post(Self::handle_token))
            .with_state(resources)
    }

    /// Handle POST /register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RegisterRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let body = json_body(payload)?;
        let user = accounts::register(&resources, &body.email, &body.password).await?;

        let response = RegisterResponse {
            message: "User registered successfully".to_owned(),
            email: user.email,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /token
    async fn handle_token(
        State(resources): State<Arc<ServerResources>>,
        request: Request,
    ) -> Result<Response, AppError> {
        let credentials = Self::read_credentials(request).await?;
        let token = accounts::login(&resources, &credentials.email, &credentials.password).await?;
        Ok((StatusCode::OK, Json(token)).into_response())
    }

    async fn read_credentials(request: Request) -> Result<LoginRequest, AppError> {
        let is_form = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<LoginRequest>::from_request(request, &())
                .await
                .map_err(|e| AppError::invalid_input(format!("Invalid form body: {e}")))?;
            Ok(body)
        } else {
            let Json(body) = Json::<LoginRequest>::from_request(request, &())
                .await
                .map_err(|e| AppError::invalid_input(format!("Invalid JSON body: {e}")))?;
            Ok(body)
        }
    }
}
