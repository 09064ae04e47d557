//! Locating and parsing the JSON object embedded in a free-text model reply.
//!
//! The output contract asks for raw JSON only, but replies routinely arrive
//! fenced in markdown, wrapped in prose, or carrying trailing commas. An
//! ordered list of extraction strategies finds the candidate substring; a
//! single comma-stripping pass salvages the most common syntax slip.

use serde_json::Value;

use crate::error::AssistantError;

const PREVIEW_CHARS: usize = 120;

/// Truncated payload excerpt for diagnostics.
pub(crate) fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if out.len() < text.len() {
        out.push_str("...");
    }
    out
}

/// Extract and parse the JSON object embedded in `raw`.
///
/// Strategies, tried in order, first hit wins:
/// 1. content of a code fence labeled `json`
/// 2. content of an unlabeled code fence
/// 3. brace-matched scan from the first `{` (tolerates trailing prose)
/// 4. greedy substring from the first `{` to the last `}`
///
/// The chosen substring is parsed as-is; on failure trailing commas before
/// `}` / `]` are stripped and parsing retried once. "No candidate found" and
/// "candidate found but invalid" are distinct error kinds.
pub fn extract_json(raw: &str) -> Result<Value, AssistantError> {
    let text = raw.trim();

    let candidate = fenced_block(text, true)
        .or_else(|| fenced_block(text, false))
        .or_else(|| brace_matched(text))
        .or_else(|| greedy(text));

    let Some(candidate) = candidate else {
        return Err(AssistantError::NoJsonFound {
            preview: preview(text),
        });
    };

    parse_candidate(&candidate)
}

/// Content of the first code fence, optionally requiring the `json` label.
fn fenced_block(text: &str, labeled: bool) -> Option<String> {
    let opener = if labeled { "```json" } else { "```" };
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    let inner = rest[..end].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Scan from the first `{`, counting nested braces, until depth returns to
/// zero. Handles nested objects and prose after the JSON.
fn brace_matched(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth: usize = 0;
    for (i, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Everything from the first `{` to the last `}`.
fn greedy(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}

fn parse_candidate(candidate: &str) -> Result<Value, AssistantError> {
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first) => {
            let repaired = strip_trailing_commas(candidate);
            // Keep the first error message: it points at the real defect.
            serde_json::from_str(&repaired).map_err(|_| AssistantError::InvalidJson {
                message: first.to_string(),
                preview: preview(candidate),
            })
        }
    }
}

/// Drop commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}
