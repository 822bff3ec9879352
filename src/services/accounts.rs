// ABOUTME: Account registration and credential exchange for access tokens
// ABOUTME: Emails are normalized to lowercase; passwords are bcrypt hashed before storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitgoal_core::constants::limits::MIN_PASSWORD_LENGTH;
use fitgoal_core::errors::{AppError, AppResult, ErrorCode};
use fitgoal_core::models::User;
use tracing::info;

use crate::auth::IssuedToken;
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Message for every failed login, whatever the cause
const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Trim and lowercase an email address
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural email check: `local@domain.tld`
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Register a new account
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed email or short password and
/// `ResourceAlreadyExists` when the email is taken
pub async fn register(
    resources: &ServerResources,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::invalid_input("Invalid email format"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if resources.database.get_user_by_email(&email).await?.is_some() {
        AppLogger::log_auth_event(&email, "register", false);
        return Err(AppError::already_exists("Email already registered"));
    }

    let password_hash = resources.auth_manager.hash_password(password).await?;
    let user = User::new(email, password_hash);

    resources.database.create_user(&user).await.map_err(|e| {
        if e.code == ErrorCode::ResourceAlreadyExists {
            AppError::already_exists("Email already registered")
        } else {
            e
        }
    })?;

    AppLogger::log_auth_event(&user.email, "register", true);
    info!(user.id = %user.id, "User registered");
    Ok(user)
}

/// Exchange credentials for an access token
///
/// # Errors
///
/// Returns `AuthInvalid` when the account is unknown or disabled or the
/// password does not match
pub async fn login(
    resources: &ServerResources,
    email: &str,
    password: &str,
) -> AppResult<IssuedToken> {
    let email = normalize_email(email);
    let Some(user) = resources
        .database
        .get_user_by_email(&email)
        .await?
        .filter(|user| user.is_active)
    else {
        AppLogger::log_auth_event(&email, "login", false);
        return Err(AppError::auth_invalid(BAD_CREDENTIALS));
    };

    if !resources
        .auth_manager
        .verify_password(password, &user.password_hash)
        .await?
    {
        AppLogger::log_auth_event(&email, "login", false);
        return Err(AppError::auth_invalid(BAD_CREDENTIALS));
    }

    let token = resources.auth_manager.generate_token(&user)?;
    AppLogger::log_auth_event(&email, "login", true);
    Ok(token)
}
