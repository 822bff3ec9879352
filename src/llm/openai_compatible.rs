// ABOUTME: OpenAI-compatible chat completions client used as the goal planner backend
// ABOUTME: Works with OpenAI, self-hosted gateways, and RapidAPI-style proxies keyed by custom headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Posts a non-streaming chat completion and extracts the reply text from
//! either `choices[0].message.content` or, for gateways that answer in a
//! flatter shape, `messages[0].content`.
//!
//! Error mapping:
//! - connection failures, timeouts and non-2xx statuses become
//!   `ExternalServiceUnavailable` (503)
//! - a 2xx body with no extractable text becomes `ExternalServiceError` (502)

use std::time::Duration;

use async_trait::async_trait;
use fitgoal_core::errors::{AppError, ErrorCode};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::LlmConfig;

/// Service name used in error messages and logs
const SERVICE_NAME: &str = "goal planner";

/// Client-facing message for every transport-level failure
const UNAVAILABLE_MESSAGE: &str = "Failed to communicate with AI service";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Header carrying the gateway host for RapidAPI-style proxies
const HOST_HEADER_NAME: &str = "x-rapidapi-host";

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Response body; both `choices` and the flat `messages` shape are accepted
#[derive(Debug, Default, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    messages: Vec<FlatMessage>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Path appended to the base URL; empty posts to the base URL
    pub chat_path: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Header carrying the key; `Authorization` sends `Bearer <key>`
    pub api_key_header: String,
    /// Value for the `x-rapidapi-host` header, if the gateway needs one
    pub host_header: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Total request timeout
    pub timeout: Duration,
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            chat_path: config.chat_path.clone(),
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
            host_header: config.host_header.clone(),
            default_model: config.model.clone(),
            timeout: config.timeout,
        }
    }
}

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized goal planner provider"
        );
        Ok(Self { client, config })
    }

    /// Full URL requests are posted to
    fn api_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = self.config.chat_path.trim_start_matches('/');
        if path.is_empty() {
            base.to_owned()
        } else {
            format!("{base}/{path}")
        }
    }

    fn add_auth_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) if self.config.api_key_header.eq_ignore_ascii_case("authorization") => {
                request.header("Authorization", format!("Bearer {key}"))
            }
            Some(key) => request.header(self.config.api_key_header.as_str(), key.as_str()),
            None => request,
        };

        match &self.config.host_header {
            Some(host) => request.header(HOST_HEADER_NAME, host.as_str()),
            None => request,
        }
    }

    fn unavailable() -> AppError {
        AppError::new(ErrorCode::ExternalServiceUnavailable, UNAVAILABLE_MESSAGE)
    }

    /// Map a non-success status to a client-facing error
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        error!(
            status = status.as_u16(),
            body = %body.chars().take(500).collect::<String>(),
            "Goal planner returned an error status"
        );
        Self::unavailable()
    }

    /// Pull the reply text out of a successful response body
    fn extract_content(body: &str, fallback_model: &str) -> Result<ChatResponse, AppError> {
        let response: OpenAiResponse = serde_json::from_str(body).map_err(|e| {
            error!("Failed to parse goal planner response: {e}");
            AppError::external_service(SERVICE_NAME, format!("Unreadable response: {e}"))
        })?;

        let model = response
            .model
            .unwrap_or_else(|| fallback_model.to_owned());
        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                return Ok(ChatResponse {
                    content,
                    model,
                    usage,
                    finish_reason: choice.finish_reason,
                });
            }
        } else if let Some(content) = response.messages.into_iter().next().and_then(|m| m.content)
        {
            return Ok(ChatResponse {
                content,
                model,
                usage,
                finish_reason: None,
            });
        }

        error!(body = %body, "Unexpected goal planner response format");
        Err(AppError::external_service(
            SERVICE_NAME,
            "Unable to extract content from API response",
        ))
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai_compatible"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI-compatible endpoint"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %self.config.default_model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = self.config.default_model.as_str();

        let body = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let http_request = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .add_auth_headers(http_request)
            .send()
            .await
            .map_err(|e| {
                error!(timeout = e.is_timeout(), connect = e.is_connect(), "Goal planner request failed: {e}");
                Self::unavailable()
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read goal planner response: {e}");
            Self::unavailable()
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let reply = Self::extract_content(&text, model)?;
        debug!(
            chars = reply.content.len(),
            finish_reason = ?reply.finish_reason,
            "Received goal planner response"
        );
        Ok(reply)
    }
}
