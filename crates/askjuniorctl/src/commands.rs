//! Command implementations for askjuniorctl.

use anyhow::{bail, Context, Result};
use askjunior_core::config::API_KEY_ENV;
use askjunior_core::{AssistantConfig, LegalAssistant, StructuredAnswer};
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;

/// Default config location, overridable with --config.
const DEFAULT_CONFIG_PATH: &str = "/etc/askjunior/config.toml";

fn load_config(path: Option<&Path>) -> Result<AssistantConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    AssistantConfig::load(path)
}

/// Read the optional supporting document as plain text.
///
/// Structured formats (PDF, DOCX) are not handled here; callers extract text
/// upstream and pass a plain file.
pub(crate) fn read_document(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("document {} is empty", path.display());
    }
    Ok(text)
}

pub async fn ask(
    config_path: Option<&Path>,
    question: &str,
    document: Option<&Path>,
    json: bool,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("question must not be empty");
    }

    let config = load_config(config_path)?;
    let assistant = LegalAssistant::new(config)?;

    let document_context = match document {
        Some(path) => read_document(path)?,
        None => String::new(),
    };

    let (answer, report) = assistant
        .ask_legal_question(question, &document_context)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        render_answer(&answer);
        if !report.is_clean() {
            eprintln!(
                "{} repaired fields: {}",
                "note:".yellow(),
                report.repaired.join(", ")
            );
        }
    }
    Ok(())
}

fn render_answer(answer: &StructuredAnswer) {
    println!("{}", "Understanding Your Situation".bold().underline());
    println!("{}\n", answer.matter_summary);

    println!("{} {}", "Matter type:".bold(), answer.incident_type.cyan());

    if !answer.clarifying_questions.is_empty() {
        println!("\n{}", "To guide you better, please clarify:".bold());
        for question in &answer.clarifying_questions {
            println!("  • {question}");
        }
    }

    println!("\n{}", "Guidance".bold().underline());
    println!("{}", answer.conditional_guidance);

    println!("\n{}", "Possible legal pathways".bold().underline());
    for (i, pathway) in answer.legal_pathways.iter().enumerate() {
        println!("  {}. {pathway}", i + 1);
    }

    println!("\n{}", "Decision flow (mermaid)".bold().underline());
    println!("{}", answer.flowchart.dimmed());

    println!("\n{}", answer.disclaimer.italic().dimmed());
}

pub fn doctor(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match config.api_key() {
        Ok(_) => println!("{} {} is set", "ok:".green(), API_KEY_ENV),
        Err(_) => bail!("{API_KEY_ENV} is not set; the assistant cannot start"),
    }

    println!("model: {}", config.model);
    println!(
        "retry budget: {} attempts, {}s rate-limit backoff",
        config.total_attempts(),
        config.rate_limit_backoff_secs
    );
    println!("validation mode: {:?}", config.validation_mode);
    Ok(())
}
