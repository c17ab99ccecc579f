// src/infra/errors.rs — Error types for folio

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    // Provider errors (downgraded to static output by the task runner)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Model call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("No language model configured. Set ANTHROPIC_API_KEY to enable enhanced answers.")]
    NoProvider,

    #[error("Tool loop exceeded {rounds} model rounds")]
    ToolLoop { rounds: usize },

    #[error("Malformed tool call: {0}")]
    MalformedToolCall(String),

    #[error("Prompt template error: {0}")]
    Prompt(#[from] minijinja::Error),

    // Caller errors (surfaced as HTTP 4xx)
    #[error("{0}")]
    Validation(String),

    // Outbound GitHub proxy
    #[error("GitHub API error ({status}): {message}")]
    GitHub { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FolioError {
    /// Worth another attempt later. Logged alongside a downgrade.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            FolioError::Provider {
                retriable: true,
                ..
            } | FolioError::RateLimited { .. }
                | FolioError::Timeout { .. }
        )
    }

    /// Failures of the enhancement path. These never reach the caller; the
    /// capability answers with its static output instead.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            FolioError::Provider { .. }
                | FolioError::RateLimited { .. }
                | FolioError::Timeout { .. }
                | FolioError::NoProvider
                | FolioError::ToolLoop { .. }
                | FolioError::MalformedToolCall(_)
                | FolioError::Prompt(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_classification() {
        let transient = FolioError::Provider {
            provider: "anthropic".into(),
            message: "connection reset".into(),
            retriable: true,
        };
        assert!(transient.is_retriable());
        assert!(FolioError::Timeout { seconds: 30 }.is_retriable());
        assert!(!FolioError::NoProvider.is_retriable());
        assert!(!FolioError::Validation("topic is required".into()).is_retriable());
    }

    #[test]
    fn test_degradable_excludes_caller_errors() {
        assert!(FolioError::NoProvider.is_degradable());
        assert!(FolioError::ToolLoop { rounds: 6 }.is_degradable());
        assert!(FolioError::MalformedToolCall("no id".into()).is_degradable());
        assert!(!FolioError::Validation("bad".into()).is_degradable());
        assert!(!FolioError::Config("bad".into()).is_degradable());
    }

    #[test]
    fn test_display_messages() {
        let e = FolioError::RateLimited {
            provider: "anthropic".into(),
            retry_after_ms: 5000,
        };
        assert_eq!(
            e.to_string(),
            "Rate limited by 'anthropic', retry after 5000ms"
        );
        assert_eq!(
            FolioError::ToolLoop { rounds: 6 }.to_string(),
            "Tool loop exceeded 6 model rounds"
        );
    }
}
