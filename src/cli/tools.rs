// src/cli/tools.rs — Print the MCP tool registry

use crate::mcp::ToolRegistry;

pub fn run_tools() {
    let registry = ToolRegistry::builtin();
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);

    println!("{} tools:", registry.len());
    for tool in registry.list() {
        println!("  {:width$}  {}", tool.name, tool.description);
    }
}
