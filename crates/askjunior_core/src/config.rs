//! Configuration for the assistant.
//!
//! Settings load from an optional TOML file with per-field defaults. The
//! provider credential comes from the `ANTHROPIC_API_KEY` environment
//! variable only, never from the file, and its absence fails assistant
//! construction before any call can be made.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::AssistantError;
use crate::repair::ValidationMode;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Low temperature keeps the JSON contract output stable.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// End-to-end timeout for one provider call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Extra attempts after the first failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause before retrying a rate-limited call.
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,

    /// Repair field defects (default) or reject with aggregated diagnostics.
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_request_timeout() -> u64 {
    45
}

fn default_max_retries() -> u32 {
    2
}

fn default_rate_limit_backoff() -> u64 {
    2
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            rate_limit_backoff_secs: default_rate_limit_backoff(),
            validation_mode: ValidationMode::default(),
        }
    }
}

impl AssistantConfig {
    /// Load from a TOML file, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the provider credential from the environment.
    ///
    /// Fail-fast contract: the assistant must not be constructible without a
    /// usable key.
    pub fn api_key(&self) -> Result<String, AssistantError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AssistantError::ApiKeyMissing),
        }
    }

    /// Total attempts the retry loop makes, first call included.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
