// ABOUTME: Configuration module for server settings loaded at startup
// ABOUTME: Re-exports the environment-derived ServerConfig and its component types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig, LlmConfig, LogLevel,
    ServerConfig,
};
