// src/cli/serve.rs — Wire the runtime together and start the HTTP API

use std::sync::Arc;

use crate::api::{self, ApiState};
use crate::core::TaskRunner;
use crate::infra::config::{Config, LlmConfig};
use crate::integrations::GithubClient;
use crate::mcp::ToolRegistry;
use crate::memory::{self, spawn_store_server};
use crate::provider::LlmService;

/// Resolve the language model once and build the runner around it.
pub fn build_runner(config: &LlmConfig) -> anyhow::Result<Arc<TaskRunner>> {
    let llm = Arc::new(LlmService::resolve(config));
    Ok(Arc::new(TaskRunner::new(llm, config)?))
}

pub async fn run_serve(config: &Config) -> anyhow::Result<()> {
    let runner = build_runner(&config.llm)?;
    let store = memory::open_store(&config.store)?;
    let (store, _store_task) = spawn_store_server(store);

    let state = ApiState {
        runner,
        tools: Arc::new(ToolRegistry::builtin()),
        store: Some(store),
        github: Arc::new(GithubClient::from_config(&config.github)?),
    };

    tracing::info!(
        db = %config.store.path,
        origins = config.server.allowed_origins.len(),
        "Starting folio {}",
        env!("CARGO_PKG_VERSION")
    );
    api::start_server(&config.server, state).await
}
