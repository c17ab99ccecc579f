// src/api/mod.rs — HTTP API: capabilities, portfolio data and the MCP endpoint

pub mod handlers;
pub mod mcp;
pub mod types;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::TaskRunner;
use crate::infra::config::ServerConfig;
use crate::integrations::GithubClient;
use crate::mcp::ToolRegistry;
use crate::memory::StoreHandle;

/// Shared state for API handlers. Everything here is read-only after startup.
#[derive(Clone)]
pub struct ApiState {
    pub runner: Arc<TaskRunner>,
    pub tools: Arc<ToolRegistry>,
    pub store: Option<StoreHandle>,
    pub github: Arc<GithubClient>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {o}");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::api_info))
        .route("/api/agent/info", get(handlers::agent_info))
        .route("/api/agent/chat", post(handlers::agent_chat))
        .route("/api/agent/solve-error", post(handlers::solve_error))
        .route("/api/learn", post(handlers::learn))
        .route("/api/learn/progress", get(handlers::learn_progress))
        .route("/api/teach", post(handlers::teach))
        .route("/api/teach/content", get(handlers::teach_content))
        .route("/api/contact", post(handlers::contact))
        .route("/api/contact/messages", get(handlers::contact_messages))
        .route("/api/contact/messages/{id}/read", put(handlers::mark_message_read))
        .route("/api/blog", get(handlers::blog_list))
        .route("/api/blog/{slug}", get(handlers::blog_post))
        .route("/api/github/stats", get(handlers::github_stats))
        .route("/mcp", get(mcp::info))
        .route("/mcp/tools", get(mcp::list_tools))
        .route("/mcp/tools/{name}", get(mcp::call_tool))
        .route("/mcp/rpc", post(mcp::rpc))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let router = build_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::{GithubConfig, LlmConfig};
    use crate::provider::LlmService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> ApiState {
        ApiState {
            runner: Arc::new(
                TaskRunner::new(Arc::new(LlmService::disabled()), &LlmConfig::default()).unwrap(),
            ),
            tools: Arc::new(ToolRegistry::builtin()),
            store: None,
            github: Arc::new(GithubClient::new(&GithubConfig::default(), None).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state(), &ServerConfig::default().allowed_origins);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let origins = ["https://asadullah.dev".to_string(), "bad\norigin".to_string()];
        let app = build_router(test_state(), &origins);
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/agent/chat")
            .header("origin", "https://asadullah.dev")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "https://asadullah.dev"
        );
    }

    #[tokio::test]
    async fn test_store_routes_unavailable_without_store() {
        let app = build_router(test_state(), &[]);
        let req = Request::builder().uri("/api/learn/progress").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
