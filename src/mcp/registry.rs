// src/mcp/registry.rs — Fixed tool registry for external AI-tool callers
//
// Two flat maps built once at startup: name → implementation and
// name → schema. Portfolio tools answer from the profile; capability tools
// run through the task runner and return the pretty-printed result.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::core::profile::Topic;
use crate::core::types::TaskRequest;
use crate::core::TaskRunner;
use crate::infra::errors::FolioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolImpl {
    Portfolio(Topic),
    /// Tagged with the capability name used by [`TaskRequest`].
    Capability(&'static str),
}

/// Advertised shape of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found")]
    NotFound(String),

    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    Failed { tool: String, message: String },
}

pub struct ToolRegistry {
    implementations: BTreeMap<&'static str, ToolImpl>,
    schemas: BTreeMap<&'static str, ToolSchema>,
}

fn no_args() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn level_schema() -> Value {
    json!({ "type": "string", "enum": ["beginner", "intermediate", "advanced"] })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

impl ToolRegistry {
    /// Every tool this server offers.
    pub fn builtin() -> Self {
        let mut registry = Self {
            implementations: BTreeMap::new(),
            schemas: BTreeMap::new(),
        };

        let portfolio: [(&'static str, &'static str, Topic); 6] = [
            (
                "get_skills",
                "Get Asadullah's technical skills, languages, and frameworks",
                Topic::Skills,
            ),
            ("get_projects", "Get list of Asadullah's projects with tech stack", Topic::Projects),
            (
                "get_contact",
                "Get Asadullah's contact information (email, Discord, GitHub)",
                Topic::Contact,
            ),
            ("get_about", "Get background information about Asadullah Shafique", Topic::About),
            ("get_hackathons", "Get Asadullah's hackathon experience", Topic::Hackathons),
            ("get_education", "Get Asadullah's education and current studies", Topic::Education),
        ];
        for (name, description, topic) in portfolio {
            registry.register(name, description, no_args(), ToolImpl::Portfolio(topic));
        }

        registry.register(
            "chat",
            "Ask the portfolio assistant a question",
            json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string" },
                    "session_id": { "type": "string" }
                },
                "required": ["message"]
            }),
            ToolImpl::Capability("chat"),
        );
        registry.register(
            "solve_error",
            "Explain a programming error and suggest a fix",
            json!({
                "type": "object",
                "properties": {
                    "error_message": { "type": "string" },
                    "code_snippet": { "type": "string" },
                    "language": { "type": "string" },
                    "context": { "type": "string" }
                },
                "required": ["error_message"]
            }),
            ToolImpl::Capability("solve_error"),
        );
        registry.register(
            "learn",
            "Generate a lesson plan, resources and a quiz for a topic",
            json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string" },
                    "level": level_schema(),
                    "learning_style": { "type": "string", "enum": ["interactive", "visual", "theoretical"] },
                    "questions": string_list()
                },
                "required": ["topic"]
            }),
            ToolImpl::Capability("learn"),
        );
        registry.register(
            "teach",
            "Structure contributed teaching content with exercises and related topics",
            json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string" },
                    "content": { "type": "string" },
                    "difficulty": level_schema(),
                    "examples": string_list()
                },
                "required": ["topic", "content"]
            }),
            ToolImpl::Capability("teach"),
        );

        registry
    }

    fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        imp: ToolImpl,
    ) {
        self.implementations.insert(name, imp);
        self.schemas.insert(
            name,
            ToolSchema {
                name,
                description,
                input_schema,
            },
        );
    }

    /// Schemas in name order.
    pub fn list(&self) -> Vec<&ToolSchema> {
        self.schemas.values().collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.implementations.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    pub fn schema(&self, name: &str) -> Option<&ToolSchema> {
        self.schemas.get(name)
    }

    /// Invoke a tool. `args` may be null for tools that take no arguments.
    pub async fn call(
        &self,
        runner: &TaskRunner,
        name: &str,
        args: Value,
    ) -> Result<String, ToolError> {
        let imp = *self
            .implementations
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        match imp {
            ToolImpl::Portfolio(topic) => Ok(runner.profile().respond_by_topic(topic)),
            ToolImpl::Capability(capability) => {
                let request = capability_request(name, capability, args)?;
                let result = runner.run(request).await.map_err(|e| match e {
                    FolioError::Validation(message) => ToolError::InvalidArguments {
                        tool: name.to_string(),
                        message,
                    },
                    other => ToolError::Failed {
                        tool: name.to_string(),
                        message: other.to_string(),
                    },
                })?;
                serde_json::to_string_pretty(&result).map_err(|e| ToolError::Failed {
                    tool: name.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Tag the argument object with its capability and decode it.
fn capability_request(
    tool: &str,
    capability: &'static str,
    args: Value,
) -> Result<TaskRequest, ToolError> {
    let invalid = |message: String| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message,
    };

    let mut fields = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => return Err(invalid(format!("expected an object, got {other}"))),
    };
    fields.insert("capability".into(), Value::String(capability.into()));
    serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::LlmConfig;
    use crate::provider::LlmService;
    use std::sync::Arc;

    fn runner() -> TaskRunner {
        TaskRunner::new(Arc::new(LlmService::disabled()), &LlmConfig::default()).unwrap()
    }

    #[test]
    fn test_maps_agree() {
        let registry = ToolRegistry::builtin();
        assert_eq!(registry.len(), 10);
        for name in registry.names() {
            assert_eq!(registry.schema(name).unwrap().name, name);
        }
        assert!(registry.schema("get_education").is_some());
    }

    #[test]
    fn test_schema_serializes_camel_case_key() {
        let registry = ToolRegistry::builtin();
        let v = serde_json::to_value(registry.schema("learn").unwrap()).unwrap();
        assert_eq!(v["inputSchema"]["required"][0], "topic");
    }

    #[tokio::test]
    async fn test_portfolio_tool() {
        let out = ToolRegistry::builtin()
            .call(&runner(), "get_contact", Value::Null)
            .await
            .unwrap();
        assert!(out.contains("asadullahshafique@hotmail.com"));
    }

    #[tokio::test]
    async fn test_capability_tool_returns_pretty_json() {
        let out = ToolRegistry::builtin()
            .call(
                &runner(),
                "solve_error",
                json!({"error_message": "KeyError: 'id'"}),
            )
            .await
            .unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["capability"], "solve_error");
        assert_eq!(v["mode"], "static");
        assert_eq!(v["confidence"], 0.9);
        assert!(out.contains('\n'));
    }

    #[tokio::test]
    async fn test_unknown_and_invalid() {
        let registry = ToolRegistry::builtin();
        let r = runner();
        assert!(matches!(
            registry.call(&r, "get_weather", Value::Null).await,
            Err(ToolError::NotFound(_))
        ));
        assert!(matches!(
            registry.call(&r, "learn", Value::Null).await,
            Err(ToolError::InvalidArguments { .. })
        ));
        assert!(matches!(
            registry.call(&r, "learn", json!({"topic": "  "})).await,
            Err(ToolError::InvalidArguments { .. })
        ));
        assert!(matches!(
            registry.call(&r, "teach", json!(["not", "an", "object"])).await,
            Err(ToolError::InvalidArguments { .. })
        ));
    }
}
