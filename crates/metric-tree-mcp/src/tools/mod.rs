//! MCP tool definitions for `tools/list` and `tools/call`.
//!
//! - `types`: `ToolDefinition`
//! - `names`: tool name constants for dispatch matching
//! - `definitions`: JSON Schemas grouped by area (tree, rag, analysis)

pub mod definitions;
pub mod names;
pub mod types;

pub use self::definitions::get_tool_definitions;
pub use self::names as tool_names;
