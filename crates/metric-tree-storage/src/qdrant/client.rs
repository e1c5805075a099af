//! Minimal Qdrant REST client.
//!
//! Covers the calls the mirror needs: collection lookup and creation, point
//! upsert, filtered search, and a liveness probe. The API key, when set, is
//! sent in the `api-key` header.

use std::time::Duration;

use metric_tree_core::config::QdrantConfig;
use metric_tree_core::retrieval::MetadataFilter;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Errors that can occur during Qdrant operations.
#[derive(Debug, Error)]
pub enum QdrantClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Qdrant API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type QdrantClientResult<T> = Result<T, QdrantClientError>;

/// A point to upsert.
#[derive(Debug, Clone, Serialize)]
pub struct PointStruct {
    /// UUID string or unsigned integer
    pub id: Value,
    pub vector: Vec<f32>,
    pub payload: Map<String, Value>,
}

/// A search match.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: Value,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    result: T,
}

pub struct QdrantClient {
    base_url: String,
    collection: String,
    api_key: Option<String>,
    http: Client,
}

impl QdrantClient {
    pub fn new(config: &QdrantConfig) -> QdrantClientResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(QdrantClientError::Config("url cannot be empty".into()));
        }
        if config.collection.trim().is_empty() {
            return Err(QdrantClientError::Config("collection cannot be empty".into()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QdrantClientError::Config(e.to_string()))?;

        Ok(Self {
            base_url,
            collection: config.collection.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            http,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> QdrantClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(QdrantClientError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Liveness probe.
    pub async fn health(&self) -> QdrantClientResult<bool> {
        let url = format!("{}/healthz", self.base_url);
        let response = self.authorized(self.http.get(&url)).send().await?;
        Ok(response.status().is_success())
    }

    pub async fn collection_exists(&self) -> QdrantClientResult<bool> {
        let response = self
            .authorized(self.http.get(self.collection_url()))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response).await?;
        Ok(true)
    }

    /// Create the collection with cosine distance.
    pub async fn create_collection(&self, dimension: usize) -> QdrantClientResult<()> {
        let body = json!({
            "vectors": { "size": dimension, "distance": "Cosine" }
        });
        let response = self
            .authorized(self.http.put(self.collection_url()).json(&body))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Create the collection unless it already exists.
    pub async fn ensure_collection(&self, dimension: usize) -> QdrantClientResult<()> {
        if !self.collection_exists().await? {
            self.create_collection(dimension).await?;
        }
        Ok(())
    }

    pub async fn upsert_points(&self, points: &[PointStruct]) -> QdrantClientResult<()> {
        let url = format!("{}/points?wait=true", self.collection_url());
        let body = json!({ "points": points });
        let response = self
            .authorized(self.http.put(&url).json(&body))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn search(
        &self,
        vector: &[f32],
        limit: usize,
        filter: &MetadataFilter,
    ) -> QdrantClientResult<Vec<ScoredPoint>> {
        let url = format!("{}/points/search", self.collection_url());
        let mut body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });
        if let Some(f) = filter_body(filter) {
            body["filter"] = f;
        }

        let response = self
            .authorized(self.http.post(&url).json(&body))
            .send()
            .await?;
        let parsed: ApiResponse<Vec<ScoredPoint>> = Self::check(response).await?.json().await?;
        Ok(parsed.result)
    }
}

/// `must` conditions for each set filter field; `None` when unfiltered.
pub(crate) fn filter_body(filter: &MetadataFilter) -> Option<Value> {
    let must: Vec<Value> = [("industry", &filter.industry), ("stage", &filter.stage)]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| json!({ "key": key, "match": { "value": v } }))
        })
        .collect();
    if must.is_empty() {
        None
    } else {
        Some(json!({ "must": must }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_body() {
        assert!(filter_body(&MetadataFilter::default()).is_none());

        let body = filter_body(&MetadataFilter::new(
            Some("SaaS B2B".into()),
            Some("Activation".into()),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({"must": [
                {"key": "industry", "match": {"value": "SaaS B2B"}},
                {"key": "stage", "match": {"value": "Activation"}}
            ]})
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = QdrantConfig::default();
        let client = QdrantClient::new(&config).unwrap();
        assert_eq!(client.collection(), "rag_chunks");

        config.url = "http://localhost:6333/".into();
        assert_eq!(
            QdrantClient::new(&config).unwrap().collection_url(),
            "http://localhost:6333/collections/rag_chunks"
        );

        config.url = " ".into();
        assert!(QdrantClient::new(&config).is_err());

        config = QdrantConfig::default();
        config.collection = String::new();
        assert!(QdrantClient::new(&config).is_err());
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let config = QdrantConfig {
            api_key: Some(String::new()),
            ..QdrantConfig::default()
        };
        assert!(QdrantClient::new(&config).unwrap().api_key.is_none());
    }

    #[test]
    fn test_scored_point_parses_numeric_and_uuid_ids() {
        let parsed: ApiResponse<Vec<ScoredPoint>> = serde_json::from_value(json!({
            "result": [
                {"id": 7, "score": 0.9, "payload": {"text": "a"}},
                {"id": "4f1c0e9e-5d2a-4c43-9a59-0f7d4f8f7a10", "score": 0.5}
            ],
            "status": "ok",
            "time": 0.001
        }))
        .unwrap();
        assert_eq!(parsed.result.len(), 2);
        assert!(parsed.result[1].payload.is_none());
    }
}
