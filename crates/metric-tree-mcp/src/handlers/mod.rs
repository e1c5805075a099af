//! MCP request handlers.
//!
//! `Handlers` owns the shared services and routes each JSON-RPC method.
//! Tool calls are split by area under `tools/`.

mod tools;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use metric_tree_core::embeddings::EmbeddingProvider;
use metric_tree_core::retrieval::RetrievalBackend;
use metric_tree_core::Config;
use metric_tree_ingest::IngestionService;
use serde_json::json;
use tracing::{debug, info};

use crate::protocol::{error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// MCP protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct Handlers {
    config: Arc<Config>,
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn RetrievalBackend>,
    ingest: IngestionService,
}

impl Handlers {
    pub fn new(
        config: Arc<Config>,
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn RetrievalBackend>,
        ingest: IngestionService,
    ) -> Self {
        Self {
            config,
            embedder,
            backend,
            ingest,
        }
    }

    /// Route one request.
    ///
    /// Returns `None` for notifications, whatever the method.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Dispatching method: {}", request.method);

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                info!("MCP initialized notification received");
            } else {
                debug!(method = %request.method, "Ignoring notification");
            }
            return None;
        }

        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(request.id),
            methods::SHUTDOWN => self.handle_shutdown(request.id),
            methods::TOOLS_LIST => self.handle_tools_list(request.id),
            methods::TOOLS_CALL => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("MCP initialize request received");
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {"listChanged": false}
                },
                "serverInfo": {
                    "name": self.config.server.name,
                    "version": self.config.server.version
                }
            }),
        )
    }

    /// Nothing to flush: every corpus write is durable when it returns.
    fn handle_shutdown(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("MCP shutdown request received");
        JsonRpcResponse::success(id, json!({}))
    }
}
