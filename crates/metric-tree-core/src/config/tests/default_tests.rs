//! Tests for default configuration values.

use crate::config::{
    Config, EmbeddingConfig, IngestConfig, LoggingConfig, McpConfig, RetrievalConfig,
    ServerConfig, StorageConfig,
};

#[test]
fn test_default_config() {
    let config = Config::default_config();
    assert_eq!(config.server.name, "metric-trees");
    assert_eq!(config.embedding.dimension, 384);
    assert!(!config.uses_external_index());
}

#[test]
fn test_server_config_defaults() {
    let server = ServerConfig::default();
    assert_eq!(server.name, "metric-trees", "Server name must be metric-trees");
    assert_eq!(server.version, "0.1.0");
}

#[test]
fn test_mcp_config_defaults() {
    let mcp = McpConfig::default();

    assert_eq!(mcp.transport, "stdio", "Default transport must be stdio");
    assert_eq!(mcp.max_payload_size, 10_485_760, "Max payload must be 10MB");
    assert_eq!(mcp.request_timeout, 30);
    assert_eq!(mcp.bind_address, "127.0.0.1");
    assert_eq!(mcp.tcp_port, 3100);
    assert_eq!(mcp.max_connections, 32);
}

#[test]
fn test_logging_config_defaults() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.format, "pretty");
    assert!(!logging.include_location);
}

#[test]
fn test_storage_config_defaults() {
    let storage = StorageConfig::default();
    assert_eq!(storage.data_dir, "data");
    assert_eq!(storage.corpus_file, "rag_store.jsonl");
    assert_eq!(
        storage.corpus_path(),
        std::path::Path::new("data").join("rag_store.jsonl")
    );
}

#[test]
fn test_embedding_config_defaults() {
    let embedding = EmbeddingConfig::default();
    assert_eq!(embedding.provider, "hashing");
    assert_eq!(embedding.dimension, 384);
    assert!(embedding.endpoint.is_none());
}

#[test]
fn test_retrieval_config_defaults() {
    let retrieval = RetrievalConfig::default();
    assert_eq!(retrieval.provider, "local");
    assert_eq!(retrieval.default_limit, 8);
    assert_eq!(retrieval.qdrant.url, "http://localhost:6333");
    assert_eq!(retrieval.qdrant.collection, "rag_chunks");
    assert_eq!(retrieval.qdrant.timeout_secs, 5);
    assert!(retrieval.qdrant.api_key.is_none());
}

#[test]
fn test_ingest_config_defaults() {
    let ingest = IngestConfig::default();
    assert_eq!(ingest.chunk_size, 900);
    assert_eq!(ingest.chunk_overlap, 200);
    assert_eq!(ingest.fetch_timeout_secs, 20);
}

#[test]
fn test_config_default_trait_matches_default_config() {
    let a = Config::default();
    let b = Config::default_config();
    assert_eq!(a.server.name, b.server.name);
    assert_eq!(a.retrieval.provider, b.retrieval.provider);
    assert_eq!(a.ingest.chunk_size, b.ingest.chunk_size);
}
