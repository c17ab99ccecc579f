// src/cli/ask.rs — One-shot question to the portfolio assistant

use crate::core::types::ChatInput;
use crate::infra::config::Config;

use super::serve::build_runner;

pub async fn run_ask(config: &Config, question: &[String]) -> anyhow::Result<()> {
    let runner = build_runner(&config.llm)?;
    let outcome = runner
        .chat(&ChatInput {
            message: question.join(" "),
            session_id: None,
        })
        .await;

    println!("[{}] {}", outcome.mode, outcome.value.answer);
    Ok(())
}
