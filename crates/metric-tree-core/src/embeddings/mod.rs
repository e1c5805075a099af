//! Text embedding capability.
//!
//! Retrieval and ingestion only see [`EmbeddingProvider`]. The concrete
//! provider is chosen once at startup by [`from_config`] and shared as an
//! `Arc<dyn EmbeddingProvider>`.

mod hashing;
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::EmbeddingConfig;
use crate::error::{CoreError, CoreResult};

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

/// Produces fixed-width dense vectors for text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    ///
    /// # Errors
    ///
    /// `CoreError::Embedding` when the text is blank or the backend fails.
    async fn embed(&self, content: &str) -> CoreResult<Vec<f32>>;

    /// Embed many texts, returning vectors in input order.
    async fn embed_batch(&self, contents: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(contents.len());
        for content in contents {
            out.push(self.embed(content).await?);
        }
        Ok(out)
    }

    /// Width of every vector this provider returns.
    fn dimensions(&self) -> usize;

    fn model_id(&self) -> &str;

    /// False while the provider cannot serve requests. Callers degrade to
    /// token-overlap ranking instead of failing.
    fn is_ready(&self) -> bool;
}

/// Build the configured provider.
pub fn from_config(config: &EmbeddingConfig) -> CoreResult<Arc<dyn EmbeddingProvider>> {
    config.validate()?;

    match config.provider.to_lowercase().as_str() {
        "hashing" => {
            info!(dimension = config.dimension, "Using hashing embedder");
            Ok(Arc::new(HashingEmbedder::with_dimensions(config.dimension)))
        }
        "http" => {
            let embedder = HttpEmbedder::from_config(config)?;
            info!(
                endpoint = embedder.endpoint(),
                model = %config.model,
                dimension = config.dimension,
                "Using HTTP embedder"
            );
            Ok(Arc::new(embedder))
        }
        other => Err(CoreError::ConfigError(format!(
            "unknown embedding provider '{}'",
            other
        ))),
    }
}
