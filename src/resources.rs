// ABOUTME: Centralized resource container for dependency injection into routes and services
// ABOUTME: Holds the store, goal planner, auth manager, aggregator, and configuration behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Built once at startup and shared as axum state. Tests build one with an
//! in-memory store and a scripted [`LlmProvider`].

use std::sync::Arc;

use fitgoal_intelligence::ProgressAggregator;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database_plugins::DatabaseProvider;
use crate::llm::LlmProvider;

/// Shared server resources
#[derive(Clone)]
pub struct ServerResources {
    /// Relational store
    pub database: Arc<dyn DatabaseProvider>,
    /// Goal planner backend
    pub llm: Arc<dyn LlmProvider>,
    /// Token and password handling
    pub auth_manager: Arc<AuthManager>,
    /// Progress aggregation settings
    pub aggregator: ProgressAggregator,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create a new builder for `ServerResources`
    #[must_use]
    pub const fn builder() -> ServerResourcesBuilder {
        ServerResourcesBuilder::new()
    }
}

/// Builder for [`ServerResources`]
pub struct ServerResourcesBuilder {
    database: Option<Arc<dyn DatabaseProvider>>,
    llm: Option<Arc<dyn LlmProvider>>,
    auth_manager: Option<AuthManager>,
    aggregator: Option<ProgressAggregator>,
    config: Option<Arc<ServerConfig>>,
}

impl ServerResourcesBuilder {
    /// Create an empty builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            database: None,
            llm: None,
            auth_manager: None,
            aggregator: None,
            config: None,
        }
    }

    /// Set the store
    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn DatabaseProvider>) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the goal planner backend
    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Set the auth manager
    #[must_use]
    pub fn with_auth_manager(mut self, auth_manager: AuthManager) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    /// Override the aggregator (defaults to five recent workouts)
    #[must_use]
    pub const fn with_aggregator(mut self, aggregator: ProgressAggregator) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Set the server configuration
    #[must_use]
    pub fn with_config(mut self, config: Arc<ServerConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the `ServerResources`
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing component
    pub fn build(self) -> Result<ServerResources, &'static str> {
        Ok(ServerResources {
            database: self.database.ok_or("Database is required")?,
            llm: self.llm.ok_or("LLM provider is required")?,
            auth_manager: Arc::new(self.auth_manager.ok_or("AuthManager is required")?),
            aggregator: self.aggregator.unwrap_or_default(),
            config: self.config.ok_or("Server config is required")?,
        })
    }
}

impl Default for ServerResourcesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
