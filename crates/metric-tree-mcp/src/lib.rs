//! Metric Trees MCP Server
//!
//! JSON-RPC 2.0 server implementing the Model Context Protocol (MCP) for
//! metric tree design: North Star suggestion, tree expansion and lint,
//! explanations backed by a playbook corpus, what-if propagation,
//! forecasting, elasticity estimation and corpus ingestion.
//!
//! # Transport
//!
//! - stdio: Standard input/output (default)
//! - tcp: newline-delimited JSON over TCP

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handlers::Handlers;
pub use server::{McpServer, TransportMode};
