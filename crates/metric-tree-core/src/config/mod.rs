//! Configuration management for the metric trees service.

mod sub_configs;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use sub_configs::{
    EmbeddingConfig, IngestConfig, LoggingConfig, McpConfig, QdrantConfig, RetrievalConfig,
    ServerConfig, StorageConfig,
};

/// Prefix for environment overrides (`METRIC_TREES__RETRIEVAL__PROVIDER=qdrant`).
pub const ENV_PREFIX: &str = "METRIC_TREES";

/// Main configuration structure.
///
/// Every section has defaults, so an empty file or no file at all yields a
/// usable local-only configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{METRIC_TREES_ENV}.toml (environment-specific)
    /// 3. Environment variables with METRIC_TREES__ prefix
    /// 4. Legacy QDRANT_URL / QDRANT_API_KEY / QDRANT_COLLECTION
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var("METRIC_TREES_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.apply_qdrant_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with defaults for testing/development.
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            mcp: McpConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            ingest: IngestConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.apply_qdrant_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply the unprefixed Qdrant variables used by existing deployments.
    ///
    /// Empty values are ignored.
    pub fn apply_qdrant_env(&mut self) {
        self.apply_qdrant_overrides(
            std::env::var("QDRANT_URL").ok(),
            std::env::var("QDRANT_API_KEY").ok(),
            std::env::var("QDRANT_COLLECTION").ok(),
        );
    }

    fn apply_qdrant_overrides(
        &mut self,
        url: Option<String>,
        api_key: Option<String>,
        collection: Option<String>,
    ) {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(url) = non_empty(url) {
            self.retrieval.qdrant.url = url;
        }
        if let Some(key) = non_empty(api_key) {
            self.retrieval.qdrant.api_key = Some(key);
        }
        if let Some(collection) = non_empty(collection) {
            self.retrieval.qdrant.collection = collection;
        }
    }

    /// Validate configuration values.
    ///
    /// Each section validates itself; the first failure is returned.
    pub fn validate(&self) -> CoreResult<()> {
        if self.server.name.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "server.name must be non-empty".into(),
            ));
        }

        self.mcp.validate()?;
        self.logging.validate()?;
        self.storage.validate()?;
        self.embedding.validate()?;
        self.retrieval.validate()?;
        self.ingest.validate()?;

        Ok(())
    }

    /// True when searches go to an external vector index.
    pub fn uses_external_index(&self) -> bool {
        self.retrieval.provider.eq_ignore_ascii_case("qdrant")
    }
}

#[cfg(test)]
mod override_tests {
    use super::*;

    #[test]
    fn test_qdrant_overrides_replace_defaults() {
        let mut config = Config::default_config();
        config.apply_qdrant_overrides(
            Some("http://qdrant:6333".into()),
            Some("secret".into()),
            Some("playbooks".into()),
        );

        assert_eq!(config.retrieval.qdrant.url, "http://qdrant:6333");
        assert_eq!(config.retrieval.qdrant.api_key.as_deref(), Some("secret"));
        assert_eq!(config.retrieval.qdrant.collection, "playbooks");
    }

    #[test]
    fn test_blank_qdrant_overrides_are_ignored() {
        let mut config = Config::default_config();
        config.apply_qdrant_overrides(Some("  ".into()), None, Some(String::new()));

        assert_eq!(config.retrieval.qdrant.url, "http://localhost:6333");
        assert!(config.retrieval.qdrant.api_key.is_none());
        assert_eq!(config.retrieval.qdrant.collection, "rag_chunks");
    }
}
