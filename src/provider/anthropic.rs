// src/provider/anthropic.rs — Anthropic Messages API provider

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    ChatRequest, ChatResponse, Message, ModelProvider, Role, StopReason, TokenUsage, ToolCall,
};
use crate::infra::errors::FolioError;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Build a provider with a client-level timeout. Fails only if the TLS
    /// backend cannot be initialised.
    pub fn new(
        api_key: String,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::Provider {
                provider: "anthropic".into(),
                message: format!("Failed to build HTTP client: {e}"),
                retriable: false,
            })?;
        Ok(Self {
            api_key,
            api_url: api_url.into(),
            client,
        })
    }

    fn build_request_body(&self, request: &ChatRequest) -> Value {
        build_request_body(request)
    }
}

/// Translate the provider-neutral request into a Messages API body.
///
/// Consecutive tool results are merged into a single `user` turn, as the API
/// requires every `tool_use` block to be answered in the very next message.
pub(crate) fn build_request_body(request: &ChatRequest) -> Value {
    let mut messages: Vec<Value> = Vec::new();
    let mut pending_results: Vec<Value> = Vec::new();

    for m in request.messages.iter().filter(|m| m.role != Role::System) {
        if m.role == Role::Tool {
            pending_results.push(json!({
                "type": "tool_result",
                "tool_use_id": m.tool_call_id.clone().unwrap_or_default(),
                "content": m.content,
            }));
            continue;
        }
        if !pending_results.is_empty() {
            messages.push(json!({
                "role": "user",
                "content": std::mem::take(&mut pending_results),
            }));
        }
        messages.push(message_to_json(m));
    }
    if !pending_results.is_empty() {
        messages.push(json!({ "role": "user", "content": pending_results }));
    }

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "max_tokens": request.max_tokens.unwrap_or(1024),
    });

    // An explicit system field wins; otherwise lift any system message.
    let system = request.system.clone().or_else(|| {
        request
            .messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone())
    });
    if let Some(system) = system {
        body["system"] = json!(system);
    }

    if !request.tools.is_empty() {
        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "input_schema": t.parameters,
                })
            })
            .collect();
        body["tools"] = json!(tools);
    }

    body
}

fn message_to_json(m: &Message) -> Value {
    let role = match m.role {
        Role::Assistant => "assistant",
        _ => "user",
    };
    if m.tool_calls.is_empty() {
        return json!({ "role": role, "content": m.content });
    }

    let mut blocks = Vec::with_capacity(m.tool_calls.len() + 1);
    if !m.content.is_empty() {
        blocks.push(json!({ "type": "text", "text": m.content }));
    }
    for tc in &m.tool_calls {
        blocks.push(json!({
            "type": "tool_use",
            "id": tc.id,
            "name": tc.name,
            "input": tc.arguments,
        }));
    }
    json!({ "role": role, "content": blocks })
}

/// Parse a Messages API response body.
pub(crate) fn parse_response(resp: &Value) -> ChatResponse {
    let blocks = resp["content"].as_array().cloned().unwrap_or_default();

    let content = blocks
        .iter()
        .filter(|c| c["type"] == "text")
        .map(|c| c["text"].as_str().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("");

    let tool_calls = blocks
        .iter()
        .filter(|c| c["type"] == "tool_use")
        .map(|c| ToolCall {
            id: c["id"].as_str().unwrap_or("").to_string(),
            name: c["name"].as_str().unwrap_or("").to_string(),
            arguments: c["input"].clone(),
        })
        .collect();

    let usage = TokenUsage {
        input_tokens: resp["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: resp["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32,
    };

    let stop_reason = match resp["stop_reason"].as_str() {
        Some("end_turn") => StopReason::EndTurn,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("tool_use") => StopReason::ToolUse,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::Unknown,
    };

    ChatResponse {
        content,
        tool_calls,
        usage,
        stop_reason,
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn name(&self) -> &str {
        "Anthropic"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, FolioError> {
        let body = self.build_request_body(&request);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| FolioError::Provider {
                provider: "anthropic".into(),
                message: e.to_string(),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5);
            return Err(FolioError::RateLimited {
                provider: "anthropic".into(),
                retry_after_ms: retry_after * 1000,
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(FolioError::Provider {
                provider: "anthropic".into(),
                message: format!("HTTP {}: {}", status, error_body),
                retriable: status.is_server_error(),
            });
        }

        let resp: Value = response.json().await.map_err(|e| FolioError::Provider {
            provider: "anthropic".into(),
            message: format!("Failed to parse response: {}", e),
            retriable: false,
        })?;

        Ok(parse_response(&resp))
    }
}
