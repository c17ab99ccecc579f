// src/core/mod.rs — Capabilities: static answers, model enhancement, provenance

pub mod extract;
pub mod fallback;
pub mod profile;
pub mod runner;
pub mod templates;
pub mod tool_loop;
pub mod types;

pub use runner::TaskRunner;
pub use types::{Provenance, TaskRequest, TaskResult};
