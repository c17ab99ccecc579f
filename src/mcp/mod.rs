// src/mcp/mod.rs — Tool registry and its MCP (JSON-RPC 2.0) surface

pub mod protocol;
pub mod registry;

pub use registry::{ToolError, ToolRegistry};
