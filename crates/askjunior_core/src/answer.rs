//! The structured answer contract returned for every legal question.
//!
//! The model is asked for raw JSON matching this shape, but generative output
//! drifts. The repair pass guarantees every field below is present and
//! correctly typed in what callers receive; the defaults it substitutes live
//! here next to the type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Substituted when the model omits `matterSummary` and no legacy `summary`
/// field is present.
pub const DEFAULT_MATTER_SUMMARY: &str = "Your legal matter has been reviewed.";

/// Substituted when the model omits `incidentType`.
pub const DEFAULT_INCIDENT_TYPE: &str = "Legal Inquiry";

/// Required opening of conditional guidance per the output contract.
pub const GUIDANCE_PREFIX: &str = "Based on the information available so far";

/// Substituted when the model provides neither guidance nor legacy steps.
pub const DEFAULT_GUIDANCE: &str =
    "Based on the information available so far, please provide more details for specific guidance.";

/// Substituted when the model returns no usable pathway list.
pub const DEFAULT_PATHWAYS: [&str; 2] = [
    "Consult with a legal professional for personalized advice",
    "Review relevant documentation",
];

/// Minimal decision-flow diagram substituted when the model returns none.
pub const DEFAULT_FLOWCHART: &str = "flowchart TD\n  A[\"Your Legal Matter\"] --> B[\"Review Details\"]\n  B --> C[\"Seek Professional Advice\"]";

/// Recognized mermaid diagram headers. A flowchart carrying neither gets the
/// first one prepended rather than being rejected.
pub const FLOWCHART_MARKERS: [&str; 2] = ["flowchart TD", "graph TD"];

/// Substituted when the model omits `disclaimer`.
pub const DEFAULT_DISCLAIMER: &str = "This is general legal information based on facts you've provided, not legal advice. Please consult a licensed advocate for case-specific guidance.";

/// Validated seven-field answer returned to the caller.
///
/// Serialized camelCase to match the model's output contract. Legacy
/// `summary` / `steps` fields from the previous schema version are consumed
/// during repair and never re-emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnswer {
    /// Neutral restatement of the user's situation.
    pub matter_summary: String,
    /// Short category label (e.g. "Property", "Workplace Harassment").
    pub incident_type: String,
    /// 0-4 questions; empty when the stated facts are sufficient.
    pub clarifying_questions: Vec<String>,
    /// Guidance text, conditional on the facts provided so far.
    pub conditional_guidance: String,
    /// Possible next steps, at least one.
    pub legal_pathways: Vec<String>,
    /// Mermaid decision-flow diagram.
    pub flowchart: String,
    /// Legal disclaimer.
    pub disclaimer: String,
}

/// Diagnostic record of which fields were substituted or rewritten while
/// normalizing one model reply.
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    /// Field names that were repaired, in schema order.
    pub repaired: Vec<String>,
    /// When the repair pass ran.
    pub at: DateTime<Utc>,
}

impl RepairReport {
    pub fn new() -> Self {
        Self {
            repaired: Vec::new(),
            at: Utc::now(),
        }
    }

    pub fn note(&mut self, field: &str) {
        self.repaired.push(field.to_string());
    }

    /// True when the model reply satisfied the contract as-is.
    pub fn is_clean(&self) -> bool {
        self.repaired.is_empty()
    }
}

impl Default for RepairReport {
    fn default() -> Self {
        Self::new()
    }
}
