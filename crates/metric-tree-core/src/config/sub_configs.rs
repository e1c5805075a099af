//! Sub-configuration structures for metric tree components.
//!
//! This module contains all the individual configuration structs
//! that make up the main `Config` structure.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Server identity reported by `initialize`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "metric-trees".to_string(),
            version: "0.1.0".to_string(),
        }
    }
}

/// MCP (Model Context Protocol) configuration.
///
/// Supports stdio (default) and TCP transports.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct McpConfig {
    /// Transport type: "stdio" or "tcp"
    #[serde(default = "default_transport")]
    pub transport: String,

    /// Maximum payload size in bytes (default: 10MB)
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// TCP bind address (default: "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port number (default: 3100)
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,

    /// Maximum concurrent TCP connections (default: 32)
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_transport() -> String {
    "stdio".to_string()
}

fn default_max_payload_size() -> usize {
    10_485_760 // 10MB
}

fn default_request_timeout() -> u64 {
    30
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_tcp_port() -> u16 {
    3100
}

fn default_max_connections() -> usize {
    32
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            max_payload_size: default_max_payload_size(),
            request_timeout: default_request_timeout(),
            bind_address: default_bind_address(),
            tcp_port: default_tcp_port(),
            max_connections: default_max_connections(),
        }
    }
}

impl McpConfig {
    /// Validate the MCP configuration.
    ///
    /// # Validation Rules
    ///
    /// - `transport`: Must be "stdio" or "tcp" (case-insensitive)
    /// - `max_payload_size`: Must be > 0
    /// - `request_timeout`: Must be > 0
    /// - `bind_address`, `tcp_port`, `max_connections`: Must be set when transport = "tcp"
    pub fn validate(&self) -> CoreResult<()> {
        let transport_lower = self.transport.to_lowercase();
        if transport_lower != "stdio" && transport_lower != "tcp" {
            return Err(CoreError::ConfigError(format!(
                "McpConfig validation failed: transport must be 'stdio' or 'tcp', got '{}'",
                self.transport
            )));
        }

        if self.max_payload_size == 0 {
            return Err(CoreError::ConfigError(
                "McpConfig validation failed: max_payload_size must be > 0".to_string(),
            ));
        }

        if self.request_timeout == 0 {
            return Err(CoreError::ConfigError(
                "McpConfig validation failed: request_timeout must be > 0".to_string(),
            ));
        }

        if transport_lower == "tcp" {
            if self.bind_address.trim().is_empty() {
                return Err(CoreError::ConfigError(
                    "McpConfig validation failed: bind_address must be non-empty for TCP transport"
                        .to_string(),
                ));
            }

            // u16 already caps the range, but 0 is reserved
            if self.tcp_port == 0 {
                return Err(CoreError::ConfigError(
                    "McpConfig validation failed: tcp_port must be in range 1-65535, got 0"
                        .to_string(),
                ));
            }

            if self.max_connections == 0 {
                return Err(CoreError::ConfigError(
                    "McpConfig validation failed: max_connections must be > 0 for TCP transport"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Logging configuration.
///
/// `level` is used only when `RUST_LOG` is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub include_location: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> CoreResult<()> {
        match self.format.to_lowercase().as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(CoreError::ConfigError(format!(
                "logging.format must be 'pretty', 'compact', or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Corpus storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the JSONL corpus
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// File name of the append-only corpus inside `data_dir`
    #[serde(default = "default_corpus_file")]
    pub corpus_file: String,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_corpus_file() -> String {
    "rag_store.jsonl".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            corpus_file: default_corpus_file(),
        }
    }
}

impl StorageConfig {
    /// Full path of the JSONL corpus.
    pub fn corpus_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(&self.corpus_file)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.corpus_file.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "storage.corpus_file must be non-empty".into(),
            ));
        }
        Ok(())
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// "hashing" (deterministic, offline) or "http" (external inference server)
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// Vector width shared by every record in one corpus
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    /// Base URL of the inference server, required for "http"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hashing".to_string()
}

fn default_embedding_dimension() -> usize {
    384
}

fn default_embedding_model() -> String {
    "bge-small-en-v1.5".to_string()
}

fn default_embedding_timeout() -> u64 {
    10
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimension: default_embedding_dimension(),
            endpoint: None,
            model: default_embedding_model(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.dimension == 0 {
            return Err(CoreError::ConfigError(
                "embedding.dimension must be greater than 0".into(),
            ));
        }
        match self.provider.to_lowercase().as_str() {
            "hashing" => Ok(()),
            "http" => match self.endpoint.as_deref().map(str::trim) {
                Some(endpoint) if !endpoint.is_empty() => Ok(()),
                _ => Err(CoreError::ConfigError(
                    "embedding.endpoint is required when embedding.provider = \"http\"".into(),
                )),
            },
            other => Err(CoreError::ConfigError(format!(
                "embedding.provider must be 'hashing' or 'http', got '{}'",
                other
            ))),
        }
    }
}

/// Qdrant connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QdrantConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_qdrant_collection")]
    pub collection: String,
    #[serde(default = "default_qdrant_timeout")]
    pub timeout_secs: u64,
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_qdrant_collection() -> String {
    "rag_chunks".to_string()
}

fn default_qdrant_timeout() -> u64 {
    5
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            api_key: None,
            collection: default_qdrant_collection(),
            timeout_secs: default_qdrant_timeout(),
        }
    }
}

/// Retrieval backend selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// "local" (JSONL flat file) or "qdrant" (mirrored, with local fallback)
    #[serde(default = "default_retrieval_provider")]
    pub provider: String,
    /// Default result count for searches that do not specify one
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    /// Upper bound on any requested result count
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default)]
    pub qdrant: QdrantConfig,
}

fn default_retrieval_provider() -> String {
    "local".to_string()
}

fn default_search_limit() -> usize {
    8
}

fn default_max_limit() -> usize {
    100
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            provider: default_retrieval_provider(),
            default_limit: default_search_limit(),
            max_limit: default_max_limit(),
            qdrant: QdrantConfig::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let provider = self.provider.to_lowercase();
        if provider != "local" && provider != "qdrant" {
            return Err(CoreError::ConfigError(format!(
                "retrieval.provider must be 'local' or 'qdrant', got '{}'",
                self.provider
            )));
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(CoreError::ConfigError(format!(
                "retrieval.default_limit must be in 1..={}, got {}",
                self.max_limit, self.default_limit
            )));
        }
        if provider == "qdrant" {
            if self.qdrant.url.trim().is_empty() {
                return Err(CoreError::ConfigError(
                    "retrieval.qdrant.url must be non-empty".into(),
                ));
            }
            if self.qdrant.collection.trim().is_empty() {
                return Err(CoreError::ConfigError(
                    "retrieval.qdrant.collection must be non-empty".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Document ingestion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Chunk window in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Largest document body accepted from a URL or file
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

fn default_chunk_size() -> usize {
    900
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_fetch_timeout() -> u64 {
    20
}

fn default_max_document_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.chunk_size == 0 {
            return Err(CoreError::ConfigError(
                "ingest.chunk_size must be greater than 0".into(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(CoreError::ConfigError(format!(
                "ingest.chunk_overlap ({}) must be smaller than ingest.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "ingest.fetch_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
