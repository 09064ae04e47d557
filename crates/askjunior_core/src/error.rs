//! Error types for the response normalizer.

use thiserror::Error;

/// Failure taxonomy for one ask-legal-question call.
///
/// Variants stay distinguishable so the HTTP layer can map them to status
/// codes without string matching. Only [`AssistantError::RetriesExhausted`]
/// is constructed by the orchestrator itself; everything else originates in
/// the stage that failed.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("ANTHROPIC_API_KEY is not configured")]
    ApiKeyMissing,

    #[error("API key rejected by provider (invalid or expired)")]
    Auth,

    #[error("provider rate limit exceeded")]
    RateLimited,

    #[error("provider service error (status {status})")]
    Service { status: u16 },

    #[error("model returned an empty content array")]
    EmptyReply,

    #[error("unexpected content block from model: {kind}")]
    NonTextReply { kind: String },

    #[error("no JSON object found in model reply. Preview: {preview}")]
    NoJsonFound { preview: String },

    #[error("JSON parsing failed: {message}. Preview: {preview}")]
    InvalidJson { message: String, preview: String },

    #[error("model reply violates the answer schema: {}", .0.join("; "))]
    SchemaViolations(Vec<String>),

    #[error("model call failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<AssistantError>,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AssistantError {
    /// Whether the next attempt of the retry loop may succeed.
    ///
    /// A rejected credential never recovers within one call; everything the
    /// model or the network caused may produce cleaner output next time.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AssistantError::ApiKeyMissing
                | AssistantError::Auth
                | AssistantError::RetriesExhausted { .. }
        )
    }
}
