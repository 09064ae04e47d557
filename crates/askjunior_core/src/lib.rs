//! AskJunior Core - response normalization for the legal information assistant.
//!
//! Turns a free-text legal question (plus optional document context) into a
//! validated [`StructuredAnswer`] by prompting an external text-generation
//! model, extracting the JSON object embedded in its free-text reply, and
//! repairing schema drift field by field instead of rejecting it.

pub mod answer;
pub mod assistant;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod repair;

pub use answer::{RepairReport, StructuredAnswer};
pub use assistant::LegalAssistant;
pub use client::{ClaudeClient, CompletionBackend};
pub use config::AssistantConfig;
pub use error::AssistantError;
pub use repair::ValidationMode;
