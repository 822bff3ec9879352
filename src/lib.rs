// ABOUTME: Main library entry point for the fitgoal server
// ABOUTME: Workout logging, AI-planned calorie goals, and progress summaries over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fitgoal Server
//!
//! Users log workouts and describe goals in free text. A goal planner (any
//! OpenAI-compatible chat endpoint) turns each description into a structured
//! goal, and progress against goals is aggregated on demand and persisted
//! per user after every workout mutation.
//!
//! ## Architecture
//!
//! - **routes**: axum routers, one struct per domain
//! - **services**: business rules, independent of HTTP
//! - **database** / **`database_plugins`**: `SQLite` store behind [`DatabaseProvider`](database_plugins::DatabaseProvider)
//! - **llm**: goal planner client behind [`LlmProvider`](llm::LlmProvider)
//! - **auth**: bcrypt password hashing and HS256 access tokens
//!
//! Parsing and aggregation live in `fitgoal-intelligence`; errors and models
//! in `fitgoal-core`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fitgoal_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("fitgoal configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT issuance and validation, password hashing
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// `SQLite` schema and queries
pub mod database;

/// Store abstraction used by services
pub mod database_plugins;

/// Goal planner client
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared resources handed to routes and services
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Business logic
pub mod services;

pub use fitgoal_core::{constants, errors, models};
