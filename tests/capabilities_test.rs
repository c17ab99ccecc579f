// tests/capabilities_test.rs — Integration test: capabilities with and without a model

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use folio::core::tool_loop::{PORTFOLIO_TOOL, TOOL_NOT_FOUND};
use folio::core::types::{ChatInput, LearnInput, SolveErrorInput, TeachInput};
use folio::core::{Provenance, TaskRequest, TaskRunner};
use folio::infra::config::LlmConfig;
use folio::infra::errors::FolioError;
use folio::provider::{
    ChatRequest, ChatResponse, LlmService, ModelProvider, Role, StopReason, ToolCall,
};

/// Plays back canned responses in order and records every request.
#[derive(Default)]
struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ChatResponse, FolioError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<ChatResponse, FolioError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::default(),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, i: usize) -> ChatRequest {
        self.requests.lock().unwrap()[i].clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, FolioError> {
        self.requests.lock().unwrap().push(request);
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(FolioError::Provider {
                provider: "scripted".into(),
                message: "script exhausted".into(),
                retriable: false,
            })
        })
    }
}

fn text(content: &str) -> Result<ChatResponse, FolioError> {
    Ok(ChatResponse {
        content: content.into(),
        stop_reason: StopReason::EndTurn,
        ..Default::default()
    })
}

fn tool_use(
    id: &str,
    name: &str,
    arguments: serde_json::Value,
) -> Result<ChatResponse, FolioError> {
    Ok(ChatResponse {
        tool_calls: vec![ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }],
        stop_reason: StopReason::ToolUse,
        ..Default::default()
    })
}

fn runner_with(provider: Arc<ScriptedProvider>, config: &LlmConfig) -> TaskRunner {
    let llm = LlmService::new(provider, "test-model", Duration::from_secs(5));
    TaskRunner::new(Arc::new(llm), config).unwrap()
}

fn runner(provider: Arc<ScriptedProvider>) -> TaskRunner {
    runner_with(provider, &LlmConfig::default())
}

fn ask(message: &str) -> ChatInput {
    ChatInput {
        message: message.into(),
        session_id: None,
    }
}

// ─── No credential ──────────────────────────────────────────────

#[tokio::test]
async fn test_no_credential_never_calls_model() {
    let provider = ScriptedProvider::new(vec![]);
    let probe = provider.clone();
    let llm = LlmService::resolve_with(&LlmConfig::default(), None, move |_| {
        Ok(probe as Arc<dyn ModelProvider>)
    });
    assert!(!llm.is_available());
    let runner = TaskRunner::new(Arc::new(llm), &LlmConfig::default()).unwrap();

    let requests = vec![
        TaskRequest::Chat(ask("What are the skills?")),
        TaskRequest::SolveError(SolveErrorInput::new("KeyError: 'x'")),
        TaskRequest::Learn(LearnInput::new("Docker")),
        TaskRequest::Teach(TeachInput::new("Closures", "A closure captures its environment")),
    ];
    for request in requests {
        let capability = request.capability();
        let result = runner.run(request).await.unwrap();
        assert_eq!(result.provenance(), Provenance::Static, "{capability}");
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_static_solve_error_for_not_iterable() {
    let runner = TaskRunner::new(Arc::new(LlmService::disabled()), &LlmConfig::default()).unwrap();
    let out = runner
        .solve_error(&SolveErrorInput::new("TypeError: 'int' object is not iterable"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Static);
    assert!(out.value.explanation.contains("iterable"));
    assert_eq!(out.value.confidence, 0.95);
    assert!(out.value.corrected_code.unwrap().contains("for "));
}

#[tokio::test]
async fn test_static_chat_mentions_a_skill() {
    let runner = TaskRunner::new(Arc::new(LlmService::disabled()), &LlmConfig::default()).unwrap();
    let out = runner.chat(&ask("What are the skills?")).await;

    assert_eq!(out.mode, Provenance::Static);
    let skills = runner.profile().skills;
    assert!(skills.iter().any(|s| out.value.answer.contains(s)));
}

#[tokio::test]
async fn test_static_lists_never_empty() {
    let runner = TaskRunner::new(Arc::new(LlmService::disabled()), &LlmConfig::default()).unwrap();
    let mut input = TeachInput::new("Lifetimes", "References must not outlive their data");
    input.examples = Some(vec![]);
    let teach = runner.teach(&input).await.unwrap();
    assert!(!teach.value.suggested_exercises.is_empty());
    assert!(!teach.value.related_topics.is_empty());
    assert!(teach.value.structured_content.contains("No examples provided"));

    let learn = runner.learn(&LearnInput::new("Kubernetes")).await.unwrap();
    assert!(!learn.value.resources.is_empty());
    assert!(!learn.value.quiz_questions.is_empty());
    assert!(learn.value.lesson_plan.contains("Kubernetes"));
}

// ─── Chat tool loop ─────────────────────────────────────────────

#[tokio::test]
async fn test_chat_answers_through_portfolio_tool() {
    let provider = ScriptedProvider::new(vec![
        tool_use("toolu_1", PORTFOLIO_TOOL, json!({"topic": "skills"})),
        text("He works mostly in Python and TypeScript."),
    ]);
    let out = runner(provider.clone())
        .chat(&ChatInput {
            message: "What does he code in?".into(),
            session_id: Some("s-1".into()),
        })
        .await;

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.confidence, 0.95);
    assert_eq!(out.value.session_id.as_deref(), Some("s-1"));
    assert_eq!(out.value.answer, "He works mostly in Python and TypeScript.");
    assert_eq!(provider.calls(), 2);

    let first = provider.request(0);
    assert_eq!(first.tools.len(), 1);
    assert_eq!(first.tools[0].name, PORTFOLIO_TOOL);
    assert!(first.system.is_some());

    let second = provider.request(1);
    let tool_turn = second.messages.last().unwrap();
    assert_eq!(tool_turn.role, Role::Tool);
    assert_eq!(tool_turn.tool_call_id.as_deref(), Some("toolu_1"));
    assert!(tool_turn.content.starts_with("Skills:"));
}

#[tokio::test]
async fn test_unknown_tool_continues_loop() {
    let provider = ScriptedProvider::new(vec![
        tool_use("toolu_9", "get_weather", json!({"city": "Karachi"})),
        text("I can only talk about the portfolio."),
    ]);
    let out = runner(provider.clone()).chat(&ask("What's the weather?")).await;

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.answer, "I can only talk about the portfolio.");

    let second = provider.request(1);
    let tool_turn = second.messages.last().unwrap();
    assert_eq!(tool_turn.role, Role::Tool);
    assert_eq!(tool_turn.content, TOOL_NOT_FOUND);
}

#[tokio::test]
async fn test_round_limit_degrades_to_static() {
    let config = LlmConfig {
        max_tool_rounds: 2,
        ..Default::default()
    };
    let provider = ScriptedProvider::new(
        (0..5)
            .map(|i| tool_use(&format!("toolu_{i}"), PORTFOLIO_TOOL, json!({"topic": "about"})))
            .collect(),
    );
    let out = runner_with(provider.clone(), &config).chat(&ask("Tell me about projects")).await;

    assert_eq!(out.mode, Provenance::Static);
    assert_eq!(out.value.confidence, 0.7);
    assert!(out.value.answer.starts_with("Projects:"));
    assert_eq!(provider.calls(), 2);
    assert!(out.diagnostic.unwrap().contains("2"));
}

#[tokio::test]
async fn test_tool_call_without_topic_degrades() {
    let provider = ScriptedProvider::new(vec![tool_use("toolu_1", PORTFOLIO_TOOL, json!({}))]);
    let out = runner(provider.clone()).chat(&ask("hackathons?")).await;

    assert_eq!(out.mode, Provenance::Static);
    assert!(out.value.answer.starts_with("Hackathons:"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_degrades_chat() {
    let provider = ScriptedProvider::new(vec![Err(FolioError::Provider {
        provider: "scripted".into(),
        message: "HTTP 529 overloaded".into(),
        retriable: true,
    })]);
    let out = runner(provider).chat(&ask("email?")).await;

    assert_eq!(out.mode, Provenance::Static);
    assert!(out.value.answer.contains("Email:"));
}

#[tokio::test]
async fn test_empty_message_skips_model() {
    let provider = ScriptedProvider::new(vec![text("should not be used")]);
    let out = runner(provider.clone()).chat(&ask("  ")).await;

    assert_eq!(out.mode, Provenance::Static);
    assert_eq!(provider.calls(), 0);
}

// ─── One-shot capabilities ──────────────────────────────────────

#[tokio::test]
async fn test_learn_partial_json_backfilled() {
    let provider = ScriptedProvider::new(vec![text(
        "Here you go:\n```json\n{\"lesson_plan\": \"# Rust\\n1. Ownership\", \"resources\": []}\n```",
    )]);
    let out = runner(provider.clone())
        .learn(&LearnInput::new("Rust"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.lesson_plan, "# Rust\n1. Ownership");
    // Empty list from the model keeps the static resources
    assert!(!out.value.resources.is_empty());
    assert!(!out.value.quiz_questions.is_empty());
    assert!(!out.value.next_steps.is_empty());

    let prompt = &provider.request(0).messages[0].content;
    assert!(prompt.contains("Rust"));
    assert_eq!(provider.request(0).max_tokens, Some(1500));
}

#[tokio::test]
async fn test_learn_without_json_is_static() {
    let provider = ScriptedProvider::new(vec![text("Sorry, I cannot help with that.")]);
    let out = runner(provider.clone())
        .learn(&LearnInput::new("Rust"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Static);
    assert!(out.diagnostic.is_some());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_teach_enhanced_from_json() {
    let provider = ScriptedProvider::new(vec![text(
        r#"{"acknowledgment": "Thanks for the closure notes!",
            "structured_content": "Closures, structured",
            "suggested_exercises": ["Write a counter closure"],
            "related_topics": ["Fn traits", "move semantics"]}"#,
    )]);
    let out = runner(provider)
        .teach(&TeachInput::new("Closures", "They capture variables"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.acknowledgment, "Thanks for the closure notes!");
    assert_eq!(out.value.related_topics, vec!["Fn traits", "move semantics"]);
}

#[tokio::test]
async fn test_solve_error_raw_text_is_enhanced() {
    let provider = ScriptedProvider::new(vec![text(
        "The variable is None because the lookup failed; guard it with an if.",
    )]);
    let out = runner(provider)
        .solve_error(&SolveErrorInput {
            code_snippet: Some("user.name".into()),
            ..SolveErrorInput::new("AttributeError: 'NoneType' object has no attribute 'name'")
        })
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.confidence, 0.75);
    assert!(out.value.explanation.starts_with("The variable is None"));
    assert_eq!(out.value.corrected_code.as_deref(), Some("user.name"));
}

#[tokio::test]
async fn test_solve_error_parsed_json_without_usable_fields_is_static() {
    let provider = ScriptedProvider::new(vec![text(
        r#"{"explanation": null, "confidence": "high"}"#,
    )]);
    let out = runner(provider.clone())
        .solve_error(&SolveErrorInput::new("KeyError: 'id'"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Static);
    assert_eq!(out.value.confidence, 0.90);
    assert!(out.value.explanation.contains("dictionary key"));
    assert!(out.diagnostic.is_some());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_solve_error_confidence_clamped() {
    let provider = ScriptedProvider::new(vec![text(
        r#"{"explanation": "Index past the end", "solution": "Check len()", "confidence": 1.7}"#,
    )]);
    let out = runner(provider)
        .solve_error(&SolveErrorInput::new("IndexError: list index out of range"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Enhanced);
    assert_eq!(out.value.explanation, "Index past the end");
    assert_eq!(out.value.confidence, 1.0);
    // Missing field keeps the rule's code
    assert!(out.value.corrected_code.unwrap().contains("len(my_list)"));
}

#[tokio::test]
async fn test_solve_error_provider_failure_is_static() {
    let provider = ScriptedProvider::new(vec![Err(FolioError::Timeout { seconds: 30 })]);
    let out = runner(provider)
        .solve_error(&SolveErrorInput::new("KeyError: 'id'"))
        .await
        .unwrap();

    assert_eq!(out.mode, Provenance::Static);
    assert_eq!(out.value.confidence, 0.90);
}

#[tokio::test]
async fn test_unexpected_failure_propagates_from_one_shot() {
    let provider = ScriptedProvider::new(vec![
        Err(FolioError::Config("bad provider settings".into())),
        Err(FolioError::Config("bad provider settings".into())),
    ]);
    let runner = runner(provider.clone());

    let err = runner.learn(&LearnInput::new("Rust")).await.unwrap_err();
    assert!(matches!(err, FolioError::Config(_)));

    // Chat still answers from the profile
    let out = runner.chat(&ask("What are the skills?")).await;
    assert_eq!(out.mode, Provenance::Static);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_validation_happens_before_model() {
    let provider = ScriptedProvider::new(vec![text("{}")]);
    let runner = runner(provider.clone());

    let err = runner.teach(&TeachInput::new("Closures", "  ")).await.unwrap_err();
    assert!(matches!(err, FolioError::Validation(_)));
    assert_eq!(provider.calls(), 0);
}
