// src/core/runner.rs — Fallback-capable task runner for the four capabilities
//
// Every capability follows the same policy: compute the static answer first,
// try the model only when one is configured, and downgrade to the static
// answer on any failure of the enhancement path. Enhancement failures are
// logged and never returned to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::extract::extract;
use super::fallback;
use super::profile::{ProfileFacts, PROFILE};
use super::templates::Prompts;
use super::tool_loop::ToolLoop;
use super::types::{
    ChatInput, ChatReply, ErrorSolution, LearnInput, LessonPlan, Outcome, SolveErrorInput,
    TaskRequest, TaskResult, TeachInput, TeachingContent,
};
use crate::infra::config::LlmConfig;
use crate::infra::errors::FolioError;
use crate::provider::LlmService;
use crate::util::truncate_str;

const ENHANCED_CHAT_CONFIDENCE: f64 = 0.95;
const STATIC_CHAT_CONFIDENCE: f64 = 0.7;
const RAW_SOLUTION_CONFIDENCE: f64 = 0.75;
const RAW_EXPLANATION_BYTES: usize = 500;

/// Per-capability output token limits.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudgets {
    pub chat: u32,
    pub solve_error: u32,
    pub learn: u32,
    pub teach: u32,
}

impl From<&LlmConfig> for TokenBudgets {
    fn from(config: &LlmConfig) -> Self {
        Self {
            chat: config.chat_max_tokens,
            solve_error: config.solve_max_tokens,
            learn: config.learn_max_tokens,
            teach: config.teach_max_tokens,
        }
    }
}

pub struct TaskRunner {
    llm: Arc<LlmService>,
    prompts: Prompts,
    budgets: TokenBudgets,
    max_tool_rounds: usize,
    profile: &'static ProfileFacts,
}

impl TaskRunner {
    pub fn new(llm: Arc<LlmService>, config: &LlmConfig) -> Result<Self, FolioError> {
        Ok(Self {
            llm,
            prompts: Prompts::new()?,
            budgets: TokenBudgets::from(config),
            max_tool_rounds: config.max_tool_rounds,
            profile: &PROFILE,
        })
    }

    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    pub fn profile(&self) -> &'static ProfileFacts {
        self.profile
    }

    pub fn max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    /// Validate and dispatch a request to its capability.
    pub async fn run(&self, request: TaskRequest) -> Result<TaskResult, FolioError> {
        Ok(match request {
            TaskRequest::Chat(input) => TaskResult::Chat(self.chat(&input).await),
            TaskRequest::SolveError(input) => {
                TaskResult::SolveError(self.solve_error(&input).await?)
            }
            TaskRequest::Learn(input) => TaskResult::Learn(self.learn(&input).await?),
            TaskRequest::Teach(input) => TaskResult::Teach(self.teach(&input).await?),
        })
    }

    /// Portfolio Q&A. Never fails; an empty message gets the profile summary.
    pub async fn chat(&self, input: &ChatInput) -> Outcome<ChatReply> {
        let reply = |answer: String, confidence: f64| ChatReply {
            answer,
            session_id: input.session_id.clone(),
            confidence,
        };
        let fallback = || {
            reply(
                self.profile.respond(&input.message),
                STATIC_CHAT_CONFIDENCE,
            )
        };

        if !self.llm.is_available() || input.message.trim().is_empty() {
            tracing::debug!(capability = "chat", mode = "static", "Answered from profile");
            return Outcome::fallback(fallback());
        }

        let tool_loop = ToolLoop::new(
            &self.llm,
            self.profile,
            self.max_tool_rounds,
            self.budgets.chat,
        );
        match tool_loop.run(&input.message).await {
            Ok(conv) if !conv.answer.trim().is_empty() => {
                tracing::debug!(
                    capability = "chat",
                    mode = "enhanced",
                    rounds = conv.rounds,
                    tool_calls = conv.tool_calls,
                    "Answered by model"
                );
                Outcome::enhanced(reply(conv.answer, ENHANCED_CHAT_CONFIDENCE))
            }
            Ok(conv) => {
                let diagnostic =
                    format!("model returned an empty answer after {} rounds", conv.rounds);
                tracing::warn!(
                    capability = "chat",
                    "Falling back to static output: {diagnostic}"
                );
                Outcome::degraded(fallback(), diagnostic)
            }
            Err(e) => {
                // Chat always answers; anything unexpected is still logged loudly.
                if !e.is_degradable() {
                    tracing::error!(capability = "chat", "Unexpected failure: {e}");
                }
                degrade("chat", fallback(), &e)
            }
        }
    }

    pub async fn solve_error(
        &self,
        input: &SolveErrorInput,
    ) -> Result<Outcome<ErrorSolution>, FolioError> {
        TaskRequest::SolveError(input.clone()).validate()?;
        let defaults =
            fallback::error_solution(&input.error_message, input.code_snippet.as_deref());

        let mut outcome = self
            .one_shot(
                "solve_error",
                defaults,
                |p| p.solve_error(input),
                self.budgets.solve_error,
                |miss, defaults| {
                    if miss.parsed {
                        return Outcome::degraded(defaults, "model JSON had no usable fields");
                    }
                    let raw = miss.raw.trim();
                    if raw.is_empty() {
                        return Outcome::degraded(defaults, "model returned no text");
                    }
                    // Unstructured reply: keep the model's prose as the explanation.
                    Outcome::enhanced(ErrorSolution {
                        explanation: truncate_str(raw, RAW_EXPLANATION_BYTES).to_string(),
                        solution: "Review the error message and apply the explanation".to_string(),
                        corrected_code: input.code_snippet.clone(),
                        confidence: RAW_SOLUTION_CONFIDENCE,
                    })
                },
            )
            .await?;
        outcome.value.confidence = outcome.value.confidence.clamp(0.0, 1.0);
        Ok(outcome)
    }

    pub async fn learn(&self, input: &LearnInput) -> Result<Outcome<LessonPlan>, FolioError> {
        TaskRequest::Learn(input.clone()).validate()?;
        let defaults = fallback::lesson_plan(input);
        self.one_shot(
            "learn",
            defaults,
            |p| p.learn(input),
            self.budgets.learn,
            |_, defaults| Outcome::degraded(defaults, "no usable JSON in model output"),
        )
        .await
    }

    pub async fn teach(
        &self,
        input: &TeachInput,
    ) -> Result<Outcome<TeachingContent>, FolioError> {
        TaskRequest::Teach(input.clone()).validate()?;
        let defaults = fallback::teaching_content(input);
        self.one_shot(
            "teach",
            defaults,
            |p| p.teach(input),
            self.budgets.teach,
            |_, defaults| Outcome::degraded(defaults, "no usable JSON in model output"),
        )
        .await
    }

    /// Prompt once, extract over `defaults`, and decide provenance. `on_miss`
    /// runs when the call succeeded but no field came from the model. Only
    /// failures that are not degradable reach the caller.
    async fn one_shot<T, P, M>(
        &self,
        capability: &'static str,
        defaults: T,
        render: P,
        max_tokens: u32,
        on_miss: M,
    ) -> Result<Outcome<T>, FolioError>
    where
        T: Serialize + DeserializeOwned + Clone,
        P: FnOnce(&Prompts) -> Result<String, FolioError>,
        M: FnOnce(Miss<'_>, T) -> Outcome<T>,
    {
        if !self.llm.is_available() {
            tracing::debug!(capability, mode = "static", "No model configured");
            return Ok(Outcome::fallback(defaults));
        }

        let raw = match self.call(render, max_tokens).await {
            Ok(raw) => raw,
            Err(e) if e.is_degradable() => return Ok(degrade(capability, defaults, &e)),
            Err(e) => return Err(e),
        };

        let extraction = extract(&raw, &defaults);
        if extraction.contributed() {
            tracing::debug!(
                capability,
                mode = "enhanced",
                fields = extraction.from_model,
                "Model output extracted"
            );
            return Ok(Outcome::enhanced(extraction.value));
        }

        let miss = Miss {
            raw: &raw,
            parsed: extraction.parsed,
        };
        let outcome = on_miss(miss, extraction.value);
        if let Some(diagnostic) = &outcome.diagnostic {
            tracing::warn!(capability, "Falling back to static output: {diagnostic}");
        }
        Ok(outcome)
    }

    async fn call<P>(&self, render: P, max_tokens: u32) -> Result<String, FolioError>
    where
        P: FnOnce(&Prompts) -> Result<String, FolioError>,
    {
        let prompt = render(&self.prompts)?;
        self.llm.prompt(&prompt, max_tokens).await
    }
}

/// A successful call whose output contributed no field.
struct Miss<'a> {
    raw: &'a str,
    /// The brace span parsed as JSON; only its fields were unusable.
    parsed: bool,
}

fn degrade<T>(capability: &'static str, value: T, error: &FolioError) -> Outcome<T> {
    tracing::warn!(
        capability,
        retriable = error.is_retriable(),
        "Falling back to static output: {error}"
    );
    Outcome::degraded(value, error.to_string())
}
