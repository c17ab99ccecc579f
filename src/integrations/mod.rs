// src/integrations/mod.rs — Outbound third-party APIs

pub mod github;

pub use github::{GithubClient, GithubStats};
