//! Client for a text-embeddings-inference style server.
//!
//! `POST {endpoint}/embed` with `{"inputs": [...]}` returns one vector per
//! input as `[[f32]]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;
use crate::error::{CoreError, CoreResult};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
}

/// Remote embedder.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    endpoint: String,
    model_id: String,
    dimensions: usize,
    http: Client,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> CoreResult<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(CoreError::ConfigError(
                "embedding endpoint cannot be empty".into(),
            ));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::ConfigError(e.to_string()))?;

        Ok(Self {
            endpoint,
            model_id: model_id.into(),
            dimensions,
            http,
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> CoreResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| CoreError::ConfigError("embedding.endpoint is required".into()))?;
        Self::new(
            endpoint,
            config.model.clone(),
            config.dimension,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, inputs: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        let url = format!("{}/embed", self.endpoint);
        debug!(url = %url, inputs = inputs.len(), "Embedding request");

        let response = self
            .http
            .post(&url)
            .json(&EmbedRequest { inputs })
            .send()
            .await
            .map_err(|e| CoreError::Embedding(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Embedding server returned an error");
            return Err(CoreError::Embedding(format!(
                "server returned {}: {}",
                status, body
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| CoreError::Embedding(format!("invalid response body: {}", e)))?;

        if vectors.len() != inputs.len() {
            return Err(CoreError::Embedding(format!(
                "expected {} vectors, got {}",
                inputs.len(),
                vectors.len()
            )));
        }
        for v in &vectors {
            if v.len() != self.dimensions {
                return Err(CoreError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: v.len(),
                });
            }
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, content: &str) -> CoreResult<Vec<f32>> {
        if content.trim().is_empty() {
            return Err(CoreError::Embedding("Empty content".into()));
        }
        let mut vectors = self.request(&[content.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| CoreError::Embedding("server returned no vectors".into()))
    }

    async fn embed_batch(&self, contents: &[String]) -> CoreResult<Vec<Vec<f32>>> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        if contents.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::Embedding("Empty content".into()));
        }
        self.request(contents).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn is_ready(&self) -> bool {
        true
    }
}
