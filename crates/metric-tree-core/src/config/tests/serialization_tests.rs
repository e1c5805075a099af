//! Serialization and deserialization tests for configuration.

use std::io::Write;

use crate::config::Config;

#[test]
fn test_config_serialization_round_trip() {
    let config = Config::default_config();

    let toml_str = toml::to_string(&config).expect("Config must serialize to TOML");
    let deserialized: Config =
        toml::from_str(&toml_str).expect("Config must deserialize from TOML");

    assert_eq!(
        deserialized.server.name, config.server.name,
        "Server name must match"
    );
    assert_eq!(
        deserialized.mcp.transport, config.mcp.transport,
        "MCP transport must match"
    );
    assert_eq!(
        deserialized.retrieval.qdrant.collection, config.retrieval.qdrant.collection,
        "Qdrant collection must match"
    );
    assert_eq!(
        deserialized.ingest.chunk_overlap, config.ingest.chunk_overlap,
        "Chunk overlap must match"
    );
}

#[test]
fn test_config_serialization_json_round_trip() {
    let config = Config::default_config();

    let json_str = serde_json::to_string(&config).expect("Config must serialize to JSON");
    let deserialized: Config =
        serde_json::from_str(&json_str).expect("Config must deserialize from JSON");

    assert_eq!(deserialized.embedding.provider, config.embedding.provider);
    assert_eq!(deserialized.storage.corpus_file, config.storage.corpus_file);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let toml_str = r#"
        [retrieval]
        provider = "qdrant"

        [retrieval.qdrant]
        collection = "playbooks"
    "#;

    let config: Config = toml::from_str(toml_str).expect("partial config must parse");
    assert_eq!(config.retrieval.provider, "qdrant");
    assert_eq!(config.retrieval.qdrant.collection, "playbooks");
    assert_eq!(config.retrieval.qdrant.url, "http://localhost:6333");
    assert_eq!(config.mcp.tcp_port, 3100);
    assert_eq!(config.ingest.chunk_size, 900);
}

#[test]
fn test_from_file_validates() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[ingest]\nchunk_size = 100\nchunk_overlap = 100").expect("write");

    let result = Config::from_file(file.path());
    assert!(result.is_err(), "overlap == chunk_size must be rejected");
}

#[test]
fn test_from_file_missing_path() {
    let result = Config::from_file(std::path::Path::new("/nonexistent/metric-trees.toml"));
    let err_msg = result.unwrap_err().to_string();
    assert!(err_msg.contains("Failed to read config file"));
}
