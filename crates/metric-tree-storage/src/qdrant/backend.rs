//! Qdrant-backed retrieval mirrored from the local corpus.
//!
//! The JSONL file stays the source of truth. Writes land there first and are
//! then copied to Qdrant; searches go to Qdrant and fall back to the local
//! backend whenever the index or the embedder is unavailable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use metric_tree_core::embeddings::EmbeddingProvider;
use metric_tree_core::retrieval::{
    BackendHealth, CorpusRecord, RetrievalBackend, RetrievalProvider, RetrievalQuery,
    RetrievalResults, ScoredHit,
};
use metric_tree_core::CoreResult;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::client::{PointStruct, QdrantClient, QdrantClientResult, ScoredPoint};
use crate::local::LocalFlatFileBackend;

pub struct QdrantBackend {
    client: QdrantClient,
    local: LocalFlatFileBackend,
    embedder: Arc<dyn EmbeddingProvider>,
    collection_ready: AtomicBool,
}

impl QdrantBackend {
    pub fn new(
        client: QdrantClient,
        local: LocalFlatFileBackend,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            client,
            local,
            embedder,
            collection_ready: AtomicBool::new(false),
        }
    }

    async fn ensure_collection(&self) -> QdrantClientResult<()> {
        if self.collection_ready.load(Ordering::Acquire) {
            return Ok(());
        }
        self.client
            .ensure_collection(self.embedder.dimensions())
            .await?;
        self.collection_ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn mirror(&self, records: &[CorpusRecord]) -> QdrantClientResult<usize> {
        let points: Vec<PointStruct> = records.iter().filter_map(to_point).collect();
        if points.len() < records.len() {
            warn!(
                skipped = records.len() - points.len(),
                "Records without a UUID id or vector are not mirrored to Qdrant"
            );
        }
        if points.is_empty() {
            return Ok(0);
        }
        self.ensure_collection().await?;
        self.client.upsert_points(&points).await?;
        Ok(points.len())
    }

    async fn search_index(&self, query: &RetrievalQuery) -> Option<Vec<ScoredHit>> {
        if !self.embedder.is_ready() {
            debug!("Embedder not ready; skipping Qdrant");
            return None;
        }
        let vector = match self.embedder.embed(&query.text).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Query embedding failed; using local corpus");
                return None;
            }
        };

        let result = async {
            self.ensure_collection().await?;
            self.client
                .search(&vector, query.limit, &query.filter)
                .await
        }
        .await;

        match result {
            Ok(points) => Some(points.into_iter().map(to_hit).collect()),
            Err(e) => {
                warn!(error = %e, collection = self.client.collection(), "Qdrant search failed; using local corpus");
                None
            }
        }
    }
}

/// Qdrant accepts only UUID or integer point ids.
fn to_point(record: &CorpusRecord) -> Option<PointStruct> {
    let vector = record.vector.clone()?;
    let id = Uuid::parse_str(&record.id).ok()?;
    let Ok(Value::Object(mut payload)) = serde_json::to_value(record) else {
        return None;
    };
    payload.remove("vector");
    Some(PointStruct {
        id: Value::String(id.to_string()),
        vector,
        payload,
    })
}

fn to_hit(point: ScoredPoint) -> ScoredHit {
    let point_id = match &point.id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut payload = point.payload.unwrap_or_default();
    payload
        .entry("id")
        .or_insert_with(|| Value::String(point_id.clone()));

    match serde_json::from_value::<CorpusRecord>(Value::Object(payload)) {
        Ok(record) => record.to_hit(point.score),
        Err(e) => {
            debug!(error = %e, id = %point_id, "Unreadable Qdrant payload");
            CorpusRecord::new(point_id, String::new()).to_hit(point.score)
        }
    }
}

#[async_trait]
impl RetrievalBackend for QdrantBackend {
    fn name(&self) -> &'static str {
        "qdrant"
    }

    #[instrument(skip(self, query), fields(limit = query.limit))]
    async fn search(&self, query: &RetrievalQuery) -> CoreResult<RetrievalResults> {
        if let Some(hits) = self.search_index(query).await {
            return Ok(RetrievalResults {
                hits,
                provider: RetrievalProvider::Qdrant,
            });
        }
        self.local.search(query).await
    }

    /// Durable local append, then a best-effort mirror.
    async fn upsert(&self, records: &[CorpusRecord]) -> CoreResult<usize> {
        let written = self.local.append(records.to_vec()).await?;
        match self.mirror(records).await {
            Ok(mirrored) => info!(written, mirrored, "Mirrored records to Qdrant"),
            Err(e) => warn!(error = %e, written, "Qdrant mirror failed; records kept locally"),
        }
        Ok(written)
    }

    async fn health(&self) -> CoreResult<BackendHealth> {
        let local = self.local.health().await?;
        let (healthy, detail) = match self.client.health().await {
            Ok(true) => (true, format!("collection {}", self.client.collection())),
            Ok(false) => (false, "Qdrant health check returned an error status".to_string()),
            Err(e) => (false, format!("Qdrant unreachable: {}", e)),
        };
        Ok(BackendHealth {
            backend: self.name().to_string(),
            healthy,
            corpus_records: local.corpus_records,
            detail: Some(detail),
        })
    }
}
