// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::memory::store::{ContactMessageRow, LearningProgressRow, TaughtContentRow};
use crate::mcp::registry::ToolSchema;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub environment: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AgentInfo {
    pub agent_type: &'static str,
    pub llm: String,
    pub tools: Vec<String>,
    pub llm_configured: bool,
    pub mode: &'static str,
    pub max_tool_rounds: usize,
    pub fallback: &'static str,
}

/// Request body for `POST /api/contact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be empty"));
            }
        }
        if !looks_like_email(self.email.trim()) {
            return Err("email is not a valid address".into());
        }
        Ok(())
    }
}

/// One `@` with a non-empty local part and a dot inside the domain.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ContactMessageRow>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: Vec<LearningProgressRow>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: Vec<TaughtContentRow>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ToolListResponse<'a> {
    pub tools: Vec<&'a ToolSchema>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub tool: String,
    pub result: String,
}
