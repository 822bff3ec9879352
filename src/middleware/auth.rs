// ABOUTME: Bearer token authentication for protected routes
// ABOUTME: Resolves an Authorization header to an active user or a 401 AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use fitgoal_core::errors::{AppError, AppResult};
use tracing::field::Empty;
use tracing::{debug, instrument, Span};
use uuid::Uuid;

use crate::resources::ServerResources;

/// The caller behind a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id from the token subject
    pub user_id: Uuid,
    /// Email of the stored account
    pub email: String,
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authenticate a request from its headers
///
/// # Errors
///
/// Returns `AuthRequired` when the header is missing or invalid, or the
/// account no longer exists or is disabled, and `AuthExpired` when the token
/// has expired
#[instrument(skip_all, fields(user_id = Empty))]
pub async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthenticatedUser> {
    let token = bearer_token(headers).ok_or_else(AppError::auth_required)?;
    let claims = resources.auth_manager.validate_token_detailed(token)?;
    let user_id = claims.user_id()?;

    let user = resources
        .database
        .get_user(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            debug!(user.id = %user_id, "Token subject is missing or inactive");
            AppError::auth_required()
        })?;

    Span::current().record("user_id", user_id.to_string());
    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
    })
}
