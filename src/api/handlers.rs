// src/api/handlers.rs

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::{types::*, ApiState};
use crate::blog::{self, BlogPost};
use crate::core::tool_loop::PORTFOLIO_TOOL;
use crate::core::types::{
    ChatInput, ChatReply, ErrorSolution, LearnInput, LessonPlan, Outcome, SolveErrorInput,
    TeachInput, TeachingContent,
};
use crate::infra::errors::FolioError;
use crate::integrations::GithubStats;
use crate::memory::StoreHandle;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn from_folio(e: FolioError) -> ApiError {
    match e {
        FolioError::Validation(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        FolioError::GitHub { status, message } => api_error(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            format!("GitHub API error: {message}"),
        ),
        other => {
            tracing::error!("Request failed: {other}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into our error shape.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

fn require_store(state: &ApiState) -> Result<&StoreHandle, ApiError> {
    state
        .store
        .as_ref()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, "Storage is not configured"))
}

// ─── Health & info ──────────────────────────────────────────────

/// GET / and GET /health
pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: if state.runner.llm().is_available() {
            "production"
        } else {
            "development"
        },
    })
}

/// GET /api
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "name": "Asadullah.dev Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Backend API for Asadullah Shafique's portfolio",
        "features": [
            "Contact & Blog API",
            "GitHub Stats",
            "AI Agents (Chat, Error Solver, Learn, Teach)",
            "MCP Server Integration",
        ],
        "endpoints": {
            "health": "/health",
            "contact": "/api/contact",
            "contact_messages": "/api/contact/messages",
            "blog": "/api/blog",
            "github": "/api/github/stats",
            "agent_chat": "/api/agent/chat",
            "agent_solve_error": "/api/agent/solve-error",
            "agent_info": "/api/agent/info",
            "learn": "/api/learn",
            "learn_progress": "/api/learn/progress",
            "teach": "/api/teach",
            "teach_content": "/api/teach/content",
            "mcp": "/mcp",
        },
        "documentation": "/api",
    }))
}

/// GET /api/agent/info
pub async fn agent_info(State(state): State<ApiState>) -> Json<AgentInfo> {
    let llm = state.runner.llm();
    let mode = if llm.is_available() { "enhanced" } else { "static" };
    tracing::info!("Agent mode: {mode}");

    Json(AgentInfo {
        agent_type: "Tool-calling conversation loop",
        llm: format!("{} ({})", llm.model(), llm.provider_name().unwrap_or("not configured")),
        tools: vec![PORTFOLIO_TOOL.to_string()],
        llm_configured: llm.is_available(),
        mode,
        max_tool_rounds: state.runner.max_tool_rounds(),
        fallback: "Static portfolio responses when LLM not configured",
    })
}

// ─── Capabilities ───────────────────────────────────────────────

/// POST /api/agent/chat
pub async fn agent_chat(
    State(state): State<ApiState>,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Json<Outcome<ChatReply>>, ApiError> {
    let input = body(payload)?;
    Ok(Json(state.runner.chat(&input).await))
}

/// POST /api/agent/solve-error
pub async fn solve_error(
    State(state): State<ApiState>,
    payload: Result<Json<SolveErrorInput>, JsonRejection>,
) -> Result<Json<Outcome<ErrorSolution>>, ApiError> {
    let input = body(payload)?;
    let outcome = state.runner.solve_error(&input).await.map_err(from_folio)?;
    Ok(Json(outcome))
}

/// POST /api/learn. Runs the capability, then records the request.
pub async fn learn(
    State(state): State<ApiState>,
    payload: Result<Json<LearnInput>, JsonRejection>,
) -> Result<Json<Outcome<LessonPlan>>, ApiError> {
    let input = body(payload)?;
    let outcome = state.runner.learn(&input).await.map_err(from_folio)?;

    if let Some(store) = &state.store {
        let res = store
            .insert_learning_progress(
                input.topic.trim().to_string(),
                input.level().as_str().to_string(),
                input.style().as_str().to_string(),
                outcome.mode.as_str().to_string(),
            )
            .await;
        if let Err(e) = res {
            tracing::warn!("Failed to record learning progress: {e}");
        }
    }

    Ok(Json(outcome))
}

/// GET /api/learn/progress
pub async fn learn_progress(
    State(state): State<ApiState>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let progress = require_store(&state)?
        .query_learning_progress()
        .await
        .map_err(|e| {
            tracing::error!("Failed to read learning progress: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read learning progress")
        })?;
    Ok(Json(ProgressResponse {
        total: progress.len(),
        progress,
    }))
}

/// POST /api/teach. Runs the capability, then records the contribution.
pub async fn teach(
    State(state): State<ApiState>,
    payload: Result<Json<TeachInput>, JsonRejection>,
) -> Result<Json<Outcome<TeachingContent>>, ApiError> {
    let input = body(payload)?;
    let outcome = state.runner.teach(&input).await.map_err(from_folio)?;

    if let Some(store) = &state.store {
        let res = store
            .insert_taught_content(
                input.topic.trim().to_string(),
                input.content.clone(),
                input.difficulty().as_str().to_string(),
                input.examples.clone().unwrap_or_default(),
                outcome.mode.as_str().to_string(),
            )
            .await;
        if let Err(e) = res {
            tracing::warn!("Failed to record taught content: {e}");
        }
    }

    Ok(Json(outcome))
}

/// GET /api/teach/content?topic=
pub async fn teach_content(
    State(state): State<ApiState>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ContentResponse>, ApiError> {
    let topic = query.topic.filter(|t| !t.trim().is_empty());
    let content = require_store(&state)?
        .query_taught_content(topic)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read taught content: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read taught content")
        })?;
    Ok(Json(ContentResponse {
        total: content.len(),
        content,
    }))
}

// ─── Contact, blog, GitHub ──────────────────────────────────────

/// POST /api/contact
pub async fn contact(
    State(state): State<ApiState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let req = body(payload)?;
    req.validate()
        .map_err(|msg| api_error(StatusCode::BAD_REQUEST, msg))?;

    let store = require_store(&state)?;
    store
        .insert_contact_message(
            req.name.trim().to_string(),
            req.email.trim().to_string(),
            req.subject.trim().to_string(),
            req.message.clone(),
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to store contact message: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store message")
        })?;

    tracing::info!(subject = %req.subject.trim(), "Contact message received");
    Ok(Json(ContactResponse {
        success: true,
        message: "Message received! I'll get back to you soon.".into(),
    }))
}

/// GET /api/contact/messages?unread=
pub async fn contact_messages(
    State(state): State<ApiState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = require_store(&state)?
        .query_contact_messages(query.unread)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read contact messages: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read messages")
        })?;
    Ok(Json(MessagesResponse {
        total: messages.len(),
        messages,
    }))
}

/// PUT /api/contact/messages/{id}/read
pub async fn mark_message_read(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactResponse>, ApiError> {
    let found = require_store(&state)?
        .mark_contact_read(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update contact message {id}: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update message")
        })?;
    if !found {
        return Err(api_error(StatusCode::NOT_FOUND, "Message not found"));
    }
    Ok(Json(ContactResponse {
        success: true,
        message: format!("Message {id} marked as read"),
    }))
}

/// GET /api/blog?featured=&limit=
pub async fn blog_list(Query(query): Query<BlogQuery>) -> Json<Vec<&'static BlogPost>> {
    Json(blog::list(query.featured, query.limit))
}

/// GET /api/blog/{slug}
pub async fn blog_post(Path(slug): Path<String>) -> Result<Json<&'static BlogPost>, ApiError> {
    blog::find(&slug)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Blog post not found"))
}

/// GET /api/github/stats
pub async fn github_stats(State(state): State<ApiState>) -> Result<Json<GithubStats>, ApiError> {
    let stats = state.github.stats().await.map_err(from_folio)?;
    Ok(Json(stats))
}
