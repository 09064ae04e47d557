//! Schema validation for model replies: lenient auto-repair or strict reject.
//!
//! The production default repairs every field defect with a documented
//! substitute so the end user always gets a usable answer; the strict variant
//! collects every violation and rejects the reply with one aggregated error.
//! Which philosophy applies is a configuration decision, not a code path
//! baked into the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::answer::{
    RepairReport, StructuredAnswer, DEFAULT_DISCLAIMER, DEFAULT_FLOWCHART, DEFAULT_GUIDANCE,
    DEFAULT_INCIDENT_TYPE, DEFAULT_MATTER_SUMMARY, DEFAULT_PATHWAYS, FLOWCHART_MARKERS,
    GUIDANCE_PREFIX,
};
use crate::error::AssistantError;

/// How field defects in a parsed reply are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Substitute a fixed default for every defective field; never reject.
    #[default]
    Repair,
    /// Collect all violations and reject the reply with one aggregated error.
    Strict,
}

/// Validate a parsed reply under the configured mode.
pub fn validate(
    value: Value,
    mode: ValidationMode,
) -> Result<(StructuredAnswer, RepairReport), AssistantError> {
    match mode {
        ValidationMode::Repair => Ok(repair(value)),
        ValidationMode::Strict => strict(value).map(|answer| (answer, RepairReport::new())),
    }
}

/// Non-empty trimmed string field, or `None`.
fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Array-of-strings field, or `None` when absent or differently typed.
/// Non-string elements are dropped.
fn str_array(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

fn has_diagram_marker(flowchart: &str) -> bool {
    FLOWCHART_MARKERS.iter().any(|m| flowchart.contains(m))
}

/// Render legacy `steps` entries as numbered guidance text.
fn guidance_from_steps(steps: &[String]) -> String {
    let numbered = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{GUIDANCE_PREFIX}:\n{numbered}")
}

/// Guarantee the answer shape regardless of what the extractor produced.
///
/// Every field is checked independently; defects are replaced with the fixed
/// defaults from [`crate::answer`] and recorded in the returned report. A
/// legacy-shape reply (`summary` / `steps`) is translated rather than
/// discarded. This function never fails.
pub fn repair(value: Value) -> (StructuredAnswer, RepairReport) {
    let mut report = RepairReport::new();

    let matter_summary = match non_empty_str(&value, "matterSummary") {
        Some(s) => s,
        None => {
            report.note("matterSummary");
            // Prior schema version carried this under "summary".
            non_empty_str(&value, "summary").unwrap_or_else(|| DEFAULT_MATTER_SUMMARY.to_string())
        }
    };

    let incident_type = match non_empty_str(&value, "incidentType") {
        Some(s) => s,
        None => {
            report.note("incidentType");
            DEFAULT_INCIDENT_TYPE.to_string()
        }
    };

    let clarifying_questions = match str_array(&value, "clarifyingQuestions") {
        Some(questions) => questions,
        None => {
            report.note("clarifyingQuestions");
            Vec::new()
        }
    };

    let conditional_guidance = match non_empty_str(&value, "conditionalGuidance") {
        Some(s) => s,
        None => {
            report.note("conditionalGuidance");
            match str_array(&value, "steps").filter(|steps| !steps.is_empty()) {
                Some(steps) => guidance_from_steps(&steps),
                None => DEFAULT_GUIDANCE.to_string(),
            }
        }
    };

    let legal_pathways = match str_array(&value, "legalPathways").filter(|p| !p.is_empty()) {
        Some(pathways) => pathways,
        None => {
            report.note("legalPathways");
            DEFAULT_PATHWAYS.iter().map(|s| s.to_string()).collect()
        }
    };

    let flowchart = match value
        .get("flowchart")
        .and_then(Value::as_str)
        .filter(|f| !f.trim().is_empty())
    {
        None => {
            report.note("flowchart");
            DEFAULT_FLOWCHART.to_string()
        }
        Some(f) if has_diagram_marker(f) => f.to_string(),
        Some(f) => {
            // Salvageable diagram body, just missing the header.
            report.note("flowchart");
            format!("{}\n{}", FLOWCHART_MARKERS[0], f)
        }
    };

    let disclaimer = match non_empty_str(&value, "disclaimer") {
        Some(s) => s,
        None => {
            report.note("disclaimer");
            DEFAULT_DISCLAIMER.to_string()
        }
    };

    if !report.is_clean() {
        warn!(repaired = ?report.repaired, "model reply auto-repaired");
    }

    let answer = StructuredAnswer {
        matter_summary,
        incident_type,
        clarifying_questions,
        conditional_guidance,
        legal_pathways,
        flowchart,
        disclaimer,
    };
    (answer, report)
}

/// Strict variant: every violation is collected and the reply rejected with
/// one aggregated [`AssistantError::SchemaViolations`].
pub fn strict(value: Value) -> Result<StructuredAnswer, AssistantError> {
    let mut violations = Vec::new();

    let matter_summary = non_empty_str(&value, "matterSummary").unwrap_or_else(|| {
        violations.push("matterSummary: missing or empty".to_string());
        String::new()
    });

    let incident_type = non_empty_str(&value, "incidentType").unwrap_or_else(|| {
        violations.push("incidentType: missing or empty".to_string());
        String::new()
    });

    let clarifying_questions = match str_array(&value, "clarifyingQuestions") {
        Some(questions) if questions.len() <= 4 => questions,
        Some(_) => {
            violations.push("clarifyingQuestions: more than 4 items".to_string());
            Vec::new()
        }
        None => {
            violations.push("clarifyingQuestions: not an array".to_string());
            Vec::new()
        }
    };

    let conditional_guidance = non_empty_str(&value, "conditionalGuidance").unwrap_or_else(|| {
        violations.push("conditionalGuidance: missing or empty".to_string());
        String::new()
    });

    let legal_pathways = match str_array(&value, "legalPathways").filter(|p| !p.is_empty()) {
        Some(pathways) => pathways,
        None => {
            violations.push("legalPathways: missing or fewer than 1 item".to_string());
            Vec::new()
        }
    };

    let flowchart = match non_empty_str(&value, "flowchart") {
        Some(f) if has_diagram_marker(&f) => f,
        Some(_) => {
            violations.push("flowchart: missing diagram marker".to_string());
            String::new()
        }
        None => {
            violations.push("flowchart: missing or empty".to_string());
            String::new()
        }
    };

    let disclaimer = non_empty_str(&value, "disclaimer").unwrap_or_else(|| {
        violations.push("disclaimer: missing or empty".to_string());
        String::new()
    });

    if !violations.is_empty() {
        return Err(AssistantError::SchemaViolations(violations));
    }

    Ok(StructuredAnswer {
        matter_summary,
        incident_type,
        clarifying_questions,
        conditional_guidance,
        legal_pathways,
        flowchart,
        disclaimer,
    })
}
