//! Anthropic Messages API client.
//!
//! One outbound call per [`CompletionBackend::complete`] invocation; the
//! bounded retry loop lives in the orchestrator, not here. Provider failures
//! are normalized into the [`AssistantError`] taxonomy so the caller can tell
//! an expired key from throttling from a provider outage.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::extract::preview;

/// Production API endpoint.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One text-generation round trip: system prompt + user content in, raw
/// reply text out.
///
/// The orchestrator depends on this seam so tests can script replies without
/// the network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Claude client over the Messages API.
pub struct ClaudeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ClaudeClient {
    /// Build the client. Fails fast when the credential is not configured.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = config.api_key()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: ANTHROPIC_API_URL.to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Map a non-success HTTP status to the failure taxonomy.
fn classify_status(status: StatusCode) -> AssistantError {
    match status.as_u16() {
        401 => AssistantError::Auth,
        429 => AssistantError::RateLimited,
        s => AssistantError::Service { status: s },
    }
}

#[async_trait]
impl CompletionBackend for ClaudeClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<String, AssistantError> {
        let url = format!("{}/v1/messages", self.base_url);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_content,
            }],
        };

        debug!(
            model = %self.model,
            system_chars = system_prompt.len(),
            user_chars = user_content.len(),
            "sending messages request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %preview(&body), "provider returned error");
            return Err(classify_status(status));
        }

        let reply: MessagesResponse = response.json().await?;
        info!(stop_reason = ?reply.stop_reason, "messages response received");

        let Some(block) = reply.content.first() else {
            return Err(AssistantError::EmptyReply);
        };
        if block.kind != "text" {
            return Err(AssistantError::NonTextReply {
                kind: block.kind.clone(),
            });
        }

        debug!(chars = block.text.len(), "model reply text received");
        Ok(block.text.clone())
    }
}
