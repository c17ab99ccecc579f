// src/provider/service.rs — The language-model capability object
//
// Built once at startup and shared read-only by every request. Holds the
// provider when a credential is configured; otherwise every call short-circuits
// with `NoProvider` and no network traffic happens.

use std::sync::Arc;
use std::time::Duration;

use super::anthropic::AnthropicProvider;
use super::{ChatRequest, ChatResponse, Message, ModelProvider};
use crate::infra::config::LlmConfig;
use crate::infra::errors::FolioError;

pub struct LlmService {
    provider: Option<Arc<dyn ModelProvider>>,
    model: String,
    timeout: Duration,
}

impl LlmService {
    /// A service with no provider: every capability answers statically.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            model: LlmConfig::default().model,
            timeout: Duration::from_secs(LlmConfig::default().timeout_seconds),
        }
    }

    pub fn new(
        provider: Arc<dyn ModelProvider>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
            timeout,
        }
    }

    /// Read the credential from the environment variable named in `config`
    /// and build the Anthropic provider.
    pub fn resolve(config: &LlmConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::resolve_with(config, api_key, |key| {
            let provider = AnthropicProvider::new(
                key,
                config.base_url.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(Arc::new(provider) as Arc<dyn ModelProvider>)
        })
    }

    /// Same as [`resolve`](Self::resolve) with the key and provider factory
    /// injected. The factory is never invoked without a non-blank key.
    pub fn resolve_with<F>(config: &LlmConfig, api_key: Option<String>, build: F) -> Self
    where
        F: FnOnce(String) -> Result<Arc<dyn ModelProvider>, FolioError>,
    {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            tracing::info!(
                env = %config.api_key_env,
                "No language-model credential; capabilities will answer statically"
            );
            return Self {
                provider: None,
                model: config.model.clone(),
                timeout,
            };
        };

        match build(key) {
            Ok(provider) => {
                tracing::info!(
                    provider = provider.id(),
                    model = %config.model,
                    "Language model enabled"
                );
                Self::new(provider, config.model.clone(), timeout)
            }
            Err(e) => {
                tracing::warn!("Language model client unavailable, using static answers: {e}");
                Self {
                    provider: None,
                    model: config.model.clone(),
                    timeout,
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Send a chat request, bounded by the configured timeout.
    pub async fn complete(&self, mut request: ChatRequest) -> Result<ChatResponse, FolioError> {
        let provider = self.provider.as_ref().ok_or(FolioError::NoProvider)?;
        if request.model.is_empty() {
            request.model = self.model.clone();
        }

        match tokio::time::timeout(self.timeout, provider.chat(request)).await {
            Ok(result) => result,
            Err(_) => Err(FolioError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// One-shot completion of a single user prompt; returns the reply text.
    pub async fn prompt(&self, prompt: &str, max_tokens: u32) -> Result<String, FolioError> {
        let request = ChatRequest {
            messages: vec![Message::user(prompt)],
            max_tokens: Some(max_tokens),
            ..Default::default()
        };
        Ok(self.complete(request).await?.content)
    }
}
