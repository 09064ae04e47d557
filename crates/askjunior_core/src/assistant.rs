//! Ask-legal-question orchestration: prompt, model call, extraction,
//! validation, bounded retry.
//!
//! Each invocation is stateless and independent; retries are sequential and
//! the only await point is the provider call. Exactly one of structured
//! answer or propagated failure is produced per call.

use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::answer::{RepairReport, StructuredAnswer};
use crate::client::{ClaudeClient, CompletionBackend};
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::extract::extract_json;
use crate::prompt::build_prompt;
use crate::repair::validate;

/// The externally callable operation surface of the normalizer.
pub struct LegalAssistant {
    backend: Box<dyn CompletionBackend>,
    config: AssistantConfig,
}

impl LegalAssistant {
    /// Build the production assistant over the Claude client.
    ///
    /// Fails when the provider credential is not configured; the operation
    /// must not be usable without it.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = ClaudeClient::new(&config)?;
        Ok(Self {
            backend: Box::new(client),
            config,
        })
    }

    /// Build over a custom backend (tests, alternative providers).
    pub fn with_backend(backend: Box<dyn CompletionBackend>, config: AssistantConfig) -> Self {
        Self { backend, config }
    }

    /// Answer one legal question.
    ///
    /// Per attempt: build prompt, call the model, extract the embedded JSON,
    /// validate or repair it. Auth failures surface immediately; rate limits
    /// pause for the configured backoff before the next attempt; everything
    /// else retries until the budget is spent, after which the last error is
    /// wrapped in [`AssistantError::RetriesExhausted`] with the attempt count.
    pub async fn ask_legal_question(
        &self,
        user_message: &str,
        document_context: &str,
    ) -> Result<(StructuredAnswer, RepairReport), AssistantError> {
        let request_id = Uuid::new_v4();
        let attempts = self.config.total_attempts();
        let (system_prompt, user_content) = build_prompt(user_message, document_context);

        let mut last_error: Option<AssistantError> = None;

        for attempt in 1..=attempts {
            info!(%request_id, attempt, attempts, "asking model");

            match self.attempt(&system_prompt, &user_content).await {
                Ok((answer, report)) => {
                    info!(
                        %request_id,
                        attempt,
                        repairs = report.repaired.len(),
                        "structured answer produced"
                    );
                    return Ok((answer, report));
                }
                Err(err) if !err.is_retryable() => {
                    error!(%request_id, %err, "terminal failure, not retrying");
                    return Err(err);
                }
                Err(err) => {
                    warn!(%request_id, attempt, %err, "attempt failed");
                    let rate_limited = matches!(err, AssistantError::RateLimited);
                    last_error = Some(err);
                    if rate_limited && attempt < attempts {
                        tokio::time::sleep(Duration::from_secs(
                            self.config.rate_limit_backoff_secs,
                        ))
                        .await;
                    }
                }
            }
        }

        error!(%request_id, attempts, "all attempts failed");
        Err(match last_error {
            Some(last) => AssistantError::RetriesExhausted {
                attempts,
                last: Box::new(last),
            },
            // Unreachable: attempts >= 1, so the loop records an error before
            // falling through.
            None => AssistantError::RetriesExhausted {
                attempts,
                last: Box::new(AssistantError::EmptyReply),
            },
        })
    }

    async fn attempt(
        &self,
        system_prompt: &str,
        user_content: &str,
    ) -> Result<(StructuredAnswer, RepairReport), AssistantError> {
        let raw = self.backend.complete(system_prompt, user_content).await?;
        let value = extract_json(&raw)?;
        validate(value, self.config.validation_mode)
    }
}
