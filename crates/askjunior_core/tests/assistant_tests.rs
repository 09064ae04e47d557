//! Orchestrator behavior against a scripted backend: retry budget, error
//! classification, and end-to-end normalization without the network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use askjunior_core::answer::{
    DEFAULT_DISCLAIMER, DEFAULT_FLOWCHART, DEFAULT_INCIDENT_TYPE, DEFAULT_PATHWAYS,
    GUIDANCE_PREFIX,
};
use askjunior_core::{
    AssistantConfig, AssistantError, CompletionBackend, LegalAssistant, ValidationMode,
};

/// Backend that replays a fixed script of replies and counts invocations.
struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, AssistantError>>>,
    calls: Arc<AtomicU32>,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<String, AssistantError>>) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            Self {
                script: Mutex::new(script.into()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_content: &str,
    ) -> Result<String, AssistantError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AssistantError::EmptyReply))
    }
}

/// Fast test config: no real backoff sleeps.
fn test_config() -> AssistantConfig {
    AssistantConfig {
        rate_limit_backoff_secs: 0,
        ..AssistantConfig::default()
    }
}

fn assistant(script: Vec<Result<String, AssistantError>>) -> (LegalAssistant, Arc<AtomicU32>) {
    assistant_with(script, test_config())
}

fn assistant_with(
    script: Vec<Result<String, AssistantError>>,
    config: AssistantConfig,
) -> (LegalAssistant, Arc<AtomicU32>) {
    let (backend, calls) = ScriptedBackend::new(script);
    (
        LegalAssistant::with_backend(Box::new(backend), config),
        calls,
    )
}

const WELL_FORMED: &str = r#"{"matterSummary":"Tenant deposit dispute","incidentType":"Property","clarifyingQuestions":[],"conditionalGuidance":"Based on the information available so far, contact your landlord in writing.","legalPathways":["Send a written demand letter","File in small claims"],"flowchart":"flowchart TD\n A-->B","disclaimer":"Not legal advice."}"#;

#[tokio::test]
async fn well_formed_reply_yields_answer_with_no_repairs() {
    let (assistant, calls) = assistant(vec![Ok(WELL_FORMED.to_string())]);

    let (answer, report) = assistant
        .ask_legal_question("My landlord won't return my deposit", "")
        .await
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(answer.matter_summary, "Tenant deposit dispute");
    assert_eq!(answer.incident_type, "Property");
    assert!(answer.clarifying_questions.is_empty());
    assert_eq!(answer.legal_pathways.len(), 2);
    assert_eq!(answer.flowchart, "flowchart TD\n A-->B");
    assert_eq!(answer.disclaimer, "Not legal advice.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn legacy_shape_is_translated_not_rejected() {
    let legacy = r#"{"summary":"ok","steps":["Step 1: notify","Step 2: file"]}"#;
    let (assistant, _) = assistant(vec![Ok(legacy.to_string())]);

    let (answer, report) = assistant.ask_legal_question("question", "").await.unwrap();

    assert_eq!(answer.matter_summary, "ok");
    assert_eq!(
        answer.conditional_guidance,
        format!("{GUIDANCE_PREFIX}:\n1. Step 1: notify\n2. Step 2: file")
    );
    assert_eq!(answer.incident_type, DEFAULT_INCIDENT_TYPE);
    assert!(answer.clarifying_questions.is_empty());
    assert_eq!(
        answer.legal_pathways,
        DEFAULT_PATHWAYS.map(String::from).to_vec()
    );
    assert_eq!(answer.flowchart, DEFAULT_FLOWCHART);
    assert_eq!(answer.disclaimer, DEFAULT_DISCLAIMER);
    assert!(!report.is_clean());
}

#[tokio::test]
async fn transient_failures_spend_the_whole_budget_then_surface_once() {
    let (assistant, calls) = assistant(vec![
        Err(AssistantError::Service { status: 503 }),
        Err(AssistantError::Service { status: 503 }),
        Err(AssistantError::Service { status: 503 }),
    ]);

    let err = assistant
        .ask_legal_question("question", "")
        .await
        .unwrap_err();

    match err {
        AssistantError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, AssistantError::Service { status: 503 }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    // Exactly the configured budget, not one more or less.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn auth_failure_surfaces_immediately_without_retry() {
    let (assistant, calls) = assistant(vec![
        Err(AssistantError::Auth),
        Ok(WELL_FORMED.to_string()),
    ]);

    let err = assistant
        .ask_legal_question("question", "")
        .await
        .unwrap_err();

    assert!(matches!(err, AssistantError::Auth));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rate_limit_is_retried_and_then_succeeds() {
    let (assistant, calls) = assistant(vec![
        Err(AssistantError::RateLimited),
        Ok(WELL_FORMED.to_string()),
    ]);

    let (answer, _) = assistant.ask_legal_question("question", "").await.unwrap();
    assert_eq!(answer.incident_type, "Property");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unparseable_reply_is_retried_with_a_fresh_model_call() {
    let (assistant, calls) = assistant(vec![
        Ok("I'm sorry, I can only answer legal questions.".to_string()),
        Ok(WELL_FORMED.to_string()),
    ]);

    let (answer, report) = assistant.ask_legal_question("question", "").await.unwrap();
    assert!(report.is_clean());
    assert_eq!(answer.matter_summary, "Tenant deposit dispute");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn extraction_failure_on_every_attempt_names_the_last_error() {
    let (assistant, calls) = assistant(vec![
        Ok("no json here".to_string()),
        Ok("still no json".to_string()),
        Ok("none at all".to_string()),
    ]);

    let err = assistant
        .ask_legal_question("question", "")
        .await
        .unwrap_err();

    match err {
        AssistantError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, AssistantError::NoJsonFound { .. }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fenced_reply_is_normalized_like_bare_json() {
    let fenced = format!("Here is the answer:\n```json\n{WELL_FORMED}\n```");
    let (assistant, _) = assistant(vec![Ok(fenced)]);

    let (answer, report) = assistant.ask_legal_question("question", "").await.unwrap();
    assert!(report.is_clean());
    assert_eq!(answer.matter_summary, "Tenant deposit dispute");
}

#[tokio::test]
async fn strict_mode_rejects_a_defective_reply() {
    let config = AssistantConfig {
        validation_mode: ValidationMode::Strict,
        max_retries: 0,
        ..test_config()
    };
    let (assistant, calls) =
        assistant_with(vec![Ok(r#"{"matterSummary":"ok"}"#.to_string())], config);

    let err = assistant
        .ask_legal_question("question", "")
        .await
        .unwrap_err();

    match err {
        AssistantError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 1);
            assert!(matches!(*last, AssistantError::SchemaViolations(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn strict_mode_accepts_a_contract_compliant_reply() {
    let config = AssistantConfig {
        validation_mode: ValidationMode::Strict,
        ..test_config()
    };
    let (assistant, _) = assistant_with(vec![Ok(WELL_FORMED.to_string())], config);

    let (answer, report) = assistant.ask_legal_question("question", "").await.unwrap();
    assert!(report.is_clean());
    assert_eq!(answer.legal_pathways.len(), 2);
}

#[tokio::test]
async fn reduced_retry_budget_is_honored() {
    let config = AssistantConfig {
        max_retries: 0,
        ..test_config()
    };
    let (assistant, calls) = assistant_with(
        vec![
            Err(AssistantError::Service { status: 500 }),
            Ok(WELL_FORMED.to_string()),
        ],
        config,
    );

    let err = assistant
        .ask_legal_question("question", "")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AssistantError::RetriesExhausted { attempts: 1, .. }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
