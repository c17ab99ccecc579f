// src/api/mcp.rs — MCP routes: server info, REST tool listing, JSON-RPC

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::handlers::{api_error, ApiError};
use crate::api::types::{ToolCallResponse, ToolListResponse};
use crate::api::ApiState;
use crate::mcp::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::mcp::ToolError;

const SERVER_NAME: &str = "asadullah-portfolio-mcp";

/// GET /mcp
pub async fn info() -> Json<Value> {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "MCP server exposing Asadullah Shafique's portfolio as AI-queryable tools",
        "protocol": "Model Context Protocol",
        "endpoint": "/mcp/rpc",
    }))
}

/// GET /mcp/tools
pub async fn list_tools(State(state): State<ApiState>) -> Json<Value> {
    let tools = state.tools.list();
    let body = ToolListResponse {
        count: tools.len(),
        tools,
    };
    Json(serde_json::to_value(body).unwrap_or_default())
}

/// GET /mcp/tools/{name}: call a tool with no arguments.
pub async fn call_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<ToolCallResponse>, ApiError> {
    let result = state
        .tools
        .call(&state.runner, &name, Value::Null)
        .await
        .map_err(|e| {
            let status = match &e {
                ToolError::NotFound(_) => StatusCode::NOT_FOUND,
                ToolError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
                ToolError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            api_error(status, e.to_string())
        })?;
    Ok(Json(ToolCallResponse { tool: name, result }))
}

/// POST /mcp/rpc (JSON-RPC 2.0). Protocol errors are reported in the
/// envelope; the HTTP status is always 200.
pub async fn rpc(State(state): State<ApiState>, payload: String) -> Json<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str::<Value>(&payload) {
        Err(e) => {
            return Json(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            ))
        }
        Ok(value) => {
            let id = value.get("id").cloned();
            match serde_json::from_value(value) {
                Ok(req) => req,
                Err(e) => {
                    return Json(JsonRpcResponse::error(
                        id,
                        INVALID_REQUEST,
                        format!("Invalid request: {e}"),
                    ))
                }
            }
        }
    };

    tracing::debug!(method = %request.method, "MCP request");
    let id = request.id;
    Json(match request.method.as_str() {
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": state.tools.list() })),
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return Json(JsonRpcResponse::error(id, INVALID_PARAMS, "params.name is required"));
            };
            let args = request.params.get("arguments").cloned().unwrap_or(Value::Null);
            match state.tools.call(&state.runner, name, args).await {
                Ok(text) => JsonRpcResponse::success(
                    id,
                    json!({ "content": [{ "type": "text", "text": text }] }),
                ),
                Err(e) => {
                    let code = match e {
                        ToolError::NotFound(_) => METHOD_NOT_FOUND,
                        ToolError::InvalidArguments { .. } => INVALID_PARAMS,
                        ToolError::Failed { .. } => INTERNAL_ERROR,
                    };
                    JsonRpcResponse::error(id, code, e.to_string())
                }
            }
        }
        other => JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Method '{other}' not supported"),
        ),
    })
}
