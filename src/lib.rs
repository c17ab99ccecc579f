// src/lib.rs — Library root for folio

pub mod api;
pub mod blog;
pub mod cli;
pub mod core;
pub mod infra;
pub mod integrations;
pub mod mcp;
pub mod memory;
pub mod provider;
pub mod util;
