// src/core/tool_loop.rs — Tool-augmented conversation for the chat capability
//
// Two states: `Model` sends the accumulated turns and either finishes with a
// text answer or requests tools; `ToolExec` answers every requested call and
// hands control back. The number of model rounds is bounded.

use serde_json::json;

use super::profile::{ProfileFacts, Topic};
use super::templates::CHAT_SYSTEM_PROMPT;
use crate::infra::errors::FolioError;
use crate::provider::{ChatRequest, LlmService, Message, ToolCall, ToolDef};

pub const PORTFOLIO_TOOL: &str = "get_portfolio_info";
pub const TOOL_NOT_FOUND: &str = "Tool not found";

/// The single tool offered to the model during chat.
pub fn portfolio_tool() -> ToolDef {
    ToolDef {
        name: PORTFOLIO_TOOL.into(),
        description: "Get information about Asadullah's portfolio. \
            topic: one of 'skills', 'projects', 'hackathons', 'contact', 'about', 'education'"
            .into(),
        parameters: json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "enum": Topic::ALL.iter().map(Topic::as_str).collect::<Vec<_>>(),
                }
            },
            "required": ["topic"]
        }),
    }
}

enum LoopState {
    Model,
    ToolExec(Vec<ToolCall>),
}

/// A finished conversation.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub answer: String,
    /// Model calls made, including the final one.
    pub rounds: usize,
    pub tool_calls: usize,
    pub messages: Vec<Message>,
}

pub struct ToolLoop<'a> {
    llm: &'a LlmService,
    profile: &'a ProfileFacts,
    max_rounds: usize,
    max_tokens: u32,
}

impl<'a> ToolLoop<'a> {
    pub fn new(
        llm: &'a LlmService,
        profile: &'a ProfileFacts,
        max_rounds: usize,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            profile,
            max_rounds: max_rounds.max(1),
            max_tokens,
        }
    }

    /// Drive the conversation to a final answer. Any provider failure or
    /// unusable tool call aborts the whole conversation.
    pub async fn run(&self, question: &str) -> Result<Conversation, FolioError> {
        let tools = vec![portfolio_tool()];
        let mut messages = vec![Message::user(question)];
        let mut rounds = 0;
        let mut tool_calls = 0;
        let mut state = LoopState::Model;

        loop {
            state = match state {
                LoopState::Model => {
                    if rounds == self.max_rounds {
                        tracing::warn!(rounds, "Chat tool loop hit its round limit");
                        return Err(FolioError::ToolLoop { rounds });
                    }
                    rounds += 1;

                    let response = self
                        .llm
                        .complete(ChatRequest {
                            messages: messages.clone(),
                            tools: tools.clone(),
                            max_tokens: Some(self.max_tokens),
                            system: Some(CHAT_SYSTEM_PROMPT.to_string()),
                            ..Default::default()
                        })
                        .await?;
                    tracing::debug!(
                        round = rounds,
                        tokens = response.usage.total(),
                        stop = ?response.stop_reason,
                        "Model round complete"
                    );

                    if response.tool_calls.is_empty() {
                        messages.push(Message::assistant(&response.content));
                        return Ok(Conversation {
                            answer: response.content,
                            rounds,
                            tool_calls,
                            messages,
                        });
                    }

                    messages.push(Message::assistant_with_tool_calls(
                        &response.content,
                        response.tool_calls.clone(),
                    ));
                    LoopState::ToolExec(response.tool_calls)
                }
                LoopState::ToolExec(calls) => {
                    for call in &calls {
                        let result = self.dispatch(call)?;
                        tracing::debug!(tool = %call.name, "Tool call answered");
                        messages.push(Message::tool_result(&call.id, &result));
                    }
                    tool_calls += calls.len();
                    LoopState::Model
                }
            };
        }
    }

    fn dispatch(&self, call: &ToolCall) -> Result<String, FolioError> {
        if call.id.trim().is_empty() {
            return Err(FolioError::MalformedToolCall(format!(
                "call to '{}' has no id",
                call.name
            )));
        }
        if call.name != PORTFOLIO_TOOL {
            tracing::debug!(tool = %call.name, "Model requested an unknown tool");
            return Ok(TOOL_NOT_FOUND.to_string());
        }

        let topic = call.arguments["topic"].as_str().ok_or_else(|| {
            FolioError::MalformedToolCall(format!("{PORTFOLIO_TOOL} needs a string 'topic'"))
        })?;
        Ok(self.profile.respond_by_topic(Topic::parse(topic)))
    }
}
