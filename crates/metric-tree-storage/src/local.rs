//! Retrieval over the local JSONL corpus.

use std::sync::Arc;

use async_trait::async_trait;
use metric_tree_core::embeddings::EmbeddingProvider;
use metric_tree_core::retrieval::{
    rank_by_cosine, rank_by_tokens, BackendHealth, CorpusRecord, MetadataFilter,
    RetrievalBackend, RetrievalProvider, RetrievalQuery, RetrievalResults,
};
use metric_tree_core::CoreResult;
use tracing::{debug, instrument, warn};

use crate::corpus_store::CorpusStore;
use crate::error::{StorageError, StorageResult};

/// Flat-file backend: cosine over stored vectors, token overlap otherwise.
pub struct LocalFlatFileBackend {
    store: Arc<CorpusStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl LocalFlatFileBackend {
    pub fn new(store: Arc<CorpusStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &Arc<CorpusStore> {
        &self.store
    }

    pub(crate) async fn load(&self, filter: MetadataFilter) -> StorageResult<Vec<CorpusRecord>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load(&filter))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }

    pub(crate) async fn append(&self, records: Vec<CorpusRecord>) -> StorageResult<usize> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.append(&records))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }

    async fn query_vector(&self, text: &str) -> Option<Vec<f32>> {
        if !self.embedder.is_ready() {
            return None;
        }
        match self.embedder.embed(text).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "Query embedding failed; ranking by token overlap");
                None
            }
        }
    }
}

#[async_trait]
impl RetrievalBackend for LocalFlatFileBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    /// Cosine ranking when the query embeds and any stored vector is
    /// comparable; token overlap over the same filtered corpus otherwise.
    #[instrument(skip(self, query), fields(limit = query.limit))]
    async fn search(&self, query: &RetrievalQuery) -> CoreResult<RetrievalResults> {
        let corpus = self.load(query.filter.clone()).await?;
        if corpus.is_empty() {
            return Ok(RetrievalResults {
                hits: Vec::new(),
                provider: RetrievalProvider::LocalBow,
            });
        }

        if let Some(qv) = self.query_vector(&query.text).await {
            let hits = rank_by_cosine(&qv, &corpus, &query.filter, query.limit);
            if !hits.is_empty() {
                debug!(hits = hits.len(), "Ranked by cosine");
                return Ok(RetrievalResults {
                    hits,
                    provider: RetrievalProvider::LocalVectors,
                });
            }
        }

        let hits = rank_by_tokens(&query.text, &corpus, &query.filter, query.limit);
        debug!(hits = hits.len(), "Ranked by token overlap");
        Ok(RetrievalResults {
            hits,
            provider: RetrievalProvider::LocalBow,
        })
    }

    async fn upsert(&self, records: &[CorpusRecord]) -> CoreResult<usize> {
        Ok(self.append(records.to_vec()).await?)
    }

    async fn health(&self) -> CoreResult<BackendHealth> {
        let store = self.store.clone();
        let count = tokio::task::spawn_blocking(move || store.count())
            .await
            .map_err(|e| StorageError::Task(e.to_string()))??;
        Ok(BackendHealth {
            backend: self.name().to_string(),
            healthy: true,
            corpus_records: count,
            detail: Some(self.store.path().display().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use metric_tree_core::embeddings::HashingEmbedder;
    use metric_tree_core::CoreError;

    use super::*;

    struct OfflineEmbedder;

    #[async_trait]
    impl EmbeddingProvider for OfflineEmbedder {
        async fn embed(&self, _content: &str) -> CoreResult<Vec<f32>> {
            Err(CoreError::Embedding("offline".into()))
        }

        fn dimensions(&self) -> usize {
            384
        }

        fn model_id(&self) -> &str {
            "offline"
        }

        fn is_ready(&self) -> bool {
            false
        }
    }

    fn backend(
        dir: &tempfile::TempDir,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> LocalFlatFileBackend {
        let store = Arc::new(CorpusStore::new(dir.path().join("rag_store.jsonl")));
        LocalFlatFileBackend::new(store, embedder)
    }

    fn embedded(embedder: &HashingEmbedder, id: &str, text: &str) -> CorpusRecord {
        CorpusRecord::new(id, text).with_vector(embedder.embed_sync(text))
    }

    #[tokio::test]
    async fn test_empty_corpus_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, Arc::new(HashingEmbedder::new()));
        let out = backend
            .search(&RetrievalQuery::new("anything", 8))
            .await
            .unwrap();
        assert!(out.hits.is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_ranks_closest_first() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = HashingEmbedder::new();
        let backend = backend(&dir, Arc::new(embedder.clone()));
        backend
            .upsert(&[
                embedded(&embedder, "pricing", "pricing page annual plan discount"),
                embedded(&embedder, "onboarding", "onboarding checklist activation ftux"),
            ])
            .await
            .unwrap();

        let out = backend
            .search(&RetrievalQuery::new("activation onboarding checklist", 2))
            .await
            .unwrap();
        assert_eq!(out.provider, RetrievalProvider::LocalVectors);
        assert_eq!(out.hits[0].id, "onboarding");
    }

    #[tokio::test]
    async fn test_offline_embedder_falls_back_to_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let hashing = HashingEmbedder::new();
        backend(&dir, Arc::new(hashing.clone()))
            .upsert(&[
                embedded(&hashing, "a", "referral invite flows"),
                embedded(&hashing, "b", "churn surveys"),
            ])
            .await
            .unwrap();

        let offline = backend(&dir, Arc::new(OfflineEmbedder));
        let out = offline
            .search(&RetrievalQuery::new("invite referral", 5))
            .await
            .unwrap();
        assert_eq!(out.provider, RetrievalProvider::LocalBow);
        assert_eq!(out.hits[0].id, "a");
        assert_eq!(out.hits[0].score, 1.0);
        assert_eq!(out.hits.len(), 2);
    }

    #[tokio::test]
    async fn test_filter_applies_before_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = HashingEmbedder::new();
        let backend = backend(&dir, Arc::new(embedder.clone()));
        backend
            .upsert(&[
                embedded(&embedder, "saas", "activation checklist").with_industry("SaaS B2B"),
                embedded(&embedder, "shop", "activation checklist").with_industry("eCommerce"),
            ])
            .await
            .unwrap();

        let query = RetrievalQuery::new("activation checklist", 5)
            .with_filter(MetadataFilter::new(Some("eCommerce".into()), None));
        let out = backend.search(&query).await.unwrap();
        assert_eq!(out.hits.len(), 1);
        assert_eq!(out.hits[0].id, "shop");
    }

    #[tokio::test]
    async fn test_health_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = HashingEmbedder::new();
        let backend = backend(&dir, Arc::new(embedder.clone()));
        backend
            .upsert(&[embedded(&embedder, "a", "text")])
            .await
            .unwrap();
        let health = backend.health().await.unwrap();
        assert!(health.healthy);
        assert_eq!(health.corpus_records, 1);
        assert_eq!(health.backend, "local");
    }
}
