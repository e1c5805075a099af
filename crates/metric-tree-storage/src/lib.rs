//! Metric Trees Storage Layer
//!
//! Persists the playbook corpus and serves retrieval over it.
//!
//! # Architecture
//! - `corpus_store`: append-only JSONL file, the durable source of truth
//! - `local`: cosine / token-overlap ranking over the JSONL corpus
//! - `qdrant`: REST client and a backend that mirrors writes to Qdrant and
//!   falls back to `local` on any failure
//!
//! [`build_backend`] picks the backend from configuration once at startup.

pub mod corpus_store;
pub mod error;
pub mod local;
pub mod qdrant;

use std::sync::Arc;

use metric_tree_core::embeddings::EmbeddingProvider;
use metric_tree_core::retrieval::RetrievalBackend;
use metric_tree_core::Config;
use tracing::info;

pub use corpus_store::CorpusStore;
pub use error::{StorageError, StorageResult};
pub use local::LocalFlatFileBackend;
pub use qdrant::{QdrantBackend, QdrantClient, QdrantClientError};

/// Build the configured retrieval backend over the configured corpus file.
pub fn build_backend(
    config: &Config,
    embedder: Arc<dyn EmbeddingProvider>,
) -> StorageResult<Arc<dyn RetrievalBackend>> {
    let store = Arc::new(CorpusStore::new(config.storage.corpus_path()));
    let local = LocalFlatFileBackend::new(store, embedder.clone());

    if config.uses_external_index() {
        let client = QdrantClient::new(&config.retrieval.qdrant)?;
        info!(
            url = %config.retrieval.qdrant.url,
            collection = %config.retrieval.qdrant.collection,
            "Using Qdrant retrieval backend"
        );
        return Ok(Arc::new(QdrantBackend::new(client, local, embedder)));
    }

    info!(path = %config.storage.corpus_path().display(), "Using local retrieval backend");
    Ok(Arc::new(local))
}
