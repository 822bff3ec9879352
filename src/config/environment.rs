// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig passed to every component
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management
//!
//! [`ServerConfig::from_env`] is called once by the binary. The resulting value
//! is handed to [`crate::resources::ServerResources`]; nothing reads the
//! environment after startup.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fitgoal_core::constants::ports::DEFAULT_HTTP_PORT;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

/// Default database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fitgoal.db";
/// Default access token lifetime
const DEFAULT_JWT_EXPIRY_MINUTES: i64 = 30;
/// Default chat completions endpoint root
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Default planner model
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
/// Default upstream call timeout
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
/// Default whole-request timeout
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;
/// Length of the generated development JWT secret
const GENERATED_SECRET_LENGTH: usize = 64;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to a `tracing` level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// # Errors
    ///
    /// Returns an error for URL schemes other than `sqlite:`.
    pub fn parse_url(s: &str) -> Result<Self> {
        if let Some(path) = s.strip_prefix("sqlite:") {
            let path = path.trim_start_matches("//");
            if path == ":memory:" || path.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path),
                })
            }
        } else if s.contains("://") {
            bail!("Unsupported database URL scheme: {s}")
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/fitgoal.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Token issuance settings
    pub auth: AuthConfig,
    /// Goal planner upstream settings
    pub llm: LlmConfig,
    /// HTTP layer settings
    pub http: HttpConfig,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Location of the store
    pub url: DatabaseUrl,
    /// Connection pool size for file databases
    pub max_connections: u32,
}

/// Token issuance settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub jwt_expiry_minutes: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_minutes", &self.jwt_expiry_minutes)
            .finish()
    }
}

/// Goal planner upstream settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Chat completions endpoint root
    pub base_url: String,
    /// Path appended to `base_url`; empty posts to `base_url` itself
    pub chat_path: String,
    /// API key, if the endpoint needs one
    pub api_key: Option<String>,
    /// Model requested from the endpoint
    pub model: String,
    /// Header carrying the key; `Authorization` sends it as a bearer token
    pub api_key_header: String,
    /// Optional host header value (`x-rapidapi-host` style gateways)
    pub host_header: Option<String>,
    /// Upper bound on one planner call
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("chat_path", &self.chat_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_key_header", &self.api_key_header)
            .field("host_header", &self.host_header)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP layer settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Allowed CORS origins, `*` for any
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric variable does not parse or when
    /// [`ServerConfig::validate`] rejects the result.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let config = Self {
            host: env_var_or("HOST", "127.0.0.1"),
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL))?,
                max_connections: env_var_or("DATABASE_MAX_CONNECTIONS", "5")
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS value")?,
            },
            auth: AuthConfig {
                jwt_secret: jwt_secret_for(environment)?,
                jwt_expiry_minutes: env_var_or(
                    "JWT_EXPIRY_MINUTES",
                    &DEFAULT_JWT_EXPIRY_MINUTES.to_string(),
                )
                .parse()
                .context("Invalid JWT_EXPIRY_MINUTES value")?,
            },
            llm: LlmConfig {
                base_url: env_var_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
                chat_path: env_var_or("LLM_CHAT_PATH", "chat/completions"),
                api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
                model: env_var_or("LLM_MODEL", DEFAULT_LLM_MODEL),
                api_key_header: env_var_or("LLM_API_KEY_HEADER", "Authorization"),
                host_header: env::var("LLM_HOST_HEADER").ok().filter(|h| !h.is_empty()),
                timeout: Duration::from_secs(
                    env_var_or("LLM_TIMEOUT_SECS", &DEFAULT_LLM_TIMEOUT_SECS.to_string())
                        .parse()
                        .context("Invalid LLM_TIMEOUT_SECS value")?,
                ),
            },
            http: HttpConfig {
                request_timeout: Duration::from_secs(
                    env_var_or(
                        "REQUEST_TIMEOUT_SECS",
                        &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
                    )
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                ),
                cors_origins: parse_origins(&env_var_or("CORS_ORIGINS", "*")),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or short JWT secret in production, a
    /// non-positive token lifetime, or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.environment.is_production() && self.auth.jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 characters in production");
        }
        if self.auth.jwt_expiry_minutes <= 0 {
            bail!("JWT_EXPIRY_MINUTES must be positive");
        }
        if self.llm.timeout.is_zero() || self.http.request_timeout.is_zero() {
            bail!("Timeouts must be greater than zero");
        }
        if self.database.max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be greater than zero");
        }
        if self.llm.api_key.is_none() {
            warn!("LLM_API_KEY is not set; goal planning requests will likely be rejected upstream");
        }
        Ok(())
    }

    /// Configuration summary for logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Fitgoal Server Configuration:\n\
             - Environment: {}\n\
             - Bind: {}:{}\n\
             - Database: {}\n\
             - Token Lifetime: {} minutes\n\
             - Planner: {} ({})\n\
             - Request Timeout: {}s",
            self.environment,
            self.host,
            self.http_port,
            self.database.url,
            self.auth.jwt_expiry_minutes,
            self.llm.base_url,
            self.llm.model,
            self.http.request_timeout.as_secs(),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Read `JWT_SECRET`, generating a per-process secret outside production
fn jwt_secret_for(environment: Environment) -> Result<String> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ if environment.is_production() => bail!("JWT_SECRET is required in production"),
        _ => {
            warn!("JWT_SECRET not set; generating a random secret, tokens will not survive restarts");
            Ok(generate_secret())
        }
    }
}

/// Random alphanumeric secret
#[must_use]
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_ok_and(|u| u.is_memory()));
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/x.db").ok(),
            Some(DatabaseUrl::SQLite {
                path: PathBuf::from("./data/x.db")
            })
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert_eq!(
            DatabaseUrl::Memory.to_connection_string(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_generated_secret_length() {
        let secret = generate_secret();
        assert_eq!(secret.len(), GENERATED_SECRET_LENGTH);
        assert_ne!(secret, generate_secret());
    }

    #[test]
    #[serial]
    fn test_production_requires_jwt_secret() {
        env::remove_var("JWT_SECRET");
        assert!(jwt_secret_for(Environment::Production).is_err());
        assert!(jwt_secret_for(Environment::Development).is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        env::set_var("HTTP_PORT", "9100");
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("JWT_EXPIRY_MINUTES", "15");
        env::set_var("LLM_MODEL", "test-model");
        env::remove_var("ENVIRONMENT");

        let config = ServerConfig::from_env();

        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("JWT_EXPIRY_MINUTES");
        env::remove_var("LLM_MODEL");

        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.http_port), Some(9100));
        assert_eq!(config.as_ref().map(|c| c.auth.jwt_expiry_minutes), Some(15));
        assert_eq!(config.as_ref().map(|c| c.llm.model.as_str()), Some("test-model"));
        assert!(config.is_some_and(|c| c.database.url.is_memory()));
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        env::set_var("HTTP_PORT", "not-a-port");
        let result = ServerConfig::from_env();
        env::remove_var("HTTP_PORT");
        assert!(result.is_err());
    }
}
