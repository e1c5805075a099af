//! MCP server: service wiring plus the stdio loop.
//!
//! Both transports speak newline-delimited JSON-RPC. Each line is parsed,
//! checked for `jsonrpc: "2.0"` and dispatched under the configured request
//! timeout. Notifications never produce output, including on timeout.

pub mod transport;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use metric_tree_core::embeddings;
use metric_tree_core::Config;
use metric_tree_ingest::IngestionService;
use metric_tree_storage::build_backend;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::handlers::Handlers;
use crate::protocol::{error_codes, JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Selected transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Tcp,
}

impl std::str::FromStr for TransportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "tcp" => Ok(TransportMode::Tcp),
            other => Err(anyhow::anyhow!(
                "Invalid transport '{}'. Must be 'stdio' or 'tcp'.",
                other
            )),
        }
    }
}

pub struct McpServer {
    config: Arc<Config>,
    handlers: Arc<Handlers>,
    /// Caps concurrent TCP clients at `mcp.max_connections`.
    connection_semaphore: Arc<Semaphore>,
    active_connections: Arc<AtomicUsize>,
}

impl McpServer {
    /// Build the embedder, retrieval backend and ingestion pipeline from
    /// `config`.
    pub fn new(config: Config) -> Result<Self> {
        let embedder = embeddings::from_config(&config.embedding)
            .context("Failed to initialize embedding provider")?;
        let backend = build_backend(&config, embedder.clone())
            .context("Failed to initialize retrieval backend")?;
        let ingest = IngestionService::new(embedder.clone(), backend.clone(), &config.ingest)
            .context("Failed to initialize ingestion pipeline")?;

        info!(
            backend = backend.name(),
            embedder = embedder.model_id(),
            corpus = %config.storage.corpus_path().display(),
            "MCP server services ready"
        );

        let config = Arc::new(config);
        let handlers = Handlers::new(config.clone(), embedder, backend, ingest);
        Ok(Self::with_handlers(config, handlers))
    }

    /// Wrap prebuilt handlers.
    pub fn with_handlers(config: Arc<Config>, handlers: Handlers) -> Self {
        let max_connections = config.mcp.max_connections;
        Self {
            config,
            handlers: Arc::new(handlers),
            connection_semaphore: Arc::new(Semaphore::new(max_connections)),
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn handlers(&self) -> &Arc<Handlers> {
        &self.handlers
    }

    /// Serve JSON-RPC over stdin/stdout until EOF.
    pub async fn run(&self) -> Result<()> {
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut writer = tokio::io::BufWriter::new(tokio::io::stdout());
        let mut line = String::new();
        let request_timeout = Duration::from_secs(self.config.mcp.request_timeout);
        let max_bytes = self.config.mcp.max_payload_size;

        info!("Server ready, waiting for requests on stdio...");

        loop {
            line.clear();

            let response = match transport::read_line_bounded(&mut reader, &mut line, max_bytes)
                .await
            {
                Ok(0) => {
                    info!("stdin closed (EOF), shutting down...");
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    debug!("Received: {}", trimmed);
                    handle_line(&self.handlers, trimmed, request_timeout).await
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!("Rejected oversized request: {}", e);
                    Some(JsonRpcResponse::error(
                        None,
                        error_codes::PAYLOAD_TOO_LARGE,
                        e.to_string(),
                    ))
                }
                Err(e) => {
                    error!("FATAL: Failed to read from stdin: {}", e);
                    return Err(anyhow::anyhow!("stdin read error: {}", e));
                }
            };

            let Some(response) = response else {
                debug!("Notification handled, no response needed");
                continue;
            };

            let response_json = serde_json::to_string(&response)?;
            debug!("Sending: {}", response_json);

            // stdout carries only newline-delimited JSON-RPC
            writer.write_all(response_json.as_bytes()).await.map_err(|e| {
                error!("FATAL: Failed to write to stdout: {}", e);
                anyhow::anyhow!("stdout write error: {}", e)
            })?;
            writer.write_all(b"\n").await?;
            writer.flush().await.map_err(|e| {
                error!("FATAL: Failed to flush stdout: {}", e);
                anyhow::anyhow!("stdout flush error: {}", e)
            })?;
        }

        info!("Server run loop exiting");
        Ok(())
    }
}

/// Pull `id` out of raw input so a timeout can still be correlated.
fn peek_id(input: &str) -> Option<JsonRpcId> {
    serde_json::from_str::<serde_json::Value>(input)
        .ok()
        .and_then(|v| v.get("id").cloned())
        .and_then(|id| serde_json::from_value(id).ok())
}

/// Parse one line and dispatch it under `timeout`.
///
/// `None` means nothing is written back.
pub async fn handle_line(
    handlers: &Handlers,
    input: &str,
    timeout: Duration,
) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return Some(JsonRpcResponse::error(
                peek_id(input),
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            request.id,
            error_codes::INVALID_REQUEST,
            "Invalid JSON-RPC version. Expected '2.0'.",
        ));
    }

    let request_id = request.id.clone();
    let is_notification = request.is_notification();
    match tokio::time::timeout(timeout, handlers.dispatch(request)).await {
        Ok(response) => response,
        Err(_) => {
            error!("Request timed out after {}s", timeout.as_secs());
            if is_notification {
                return None;
            }
            Some(JsonRpcResponse::error(
                request_id,
                error_codes::REQUEST_TIMEOUT,
                format!(
                    "Request timed out after {}s. Consider increasing mcp.request_timeout.",
                    timeout.as_secs()
                ),
            ))
        }
    }
}
