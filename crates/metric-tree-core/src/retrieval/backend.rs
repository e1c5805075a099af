//! The retrieval seam: one trait, several stores behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::record::{CorpusRecord, MetadataFilter, ScoredHit};
use crate::error::CoreResult;

/// Which ranking path produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrievalProvider {
    #[serde(rename = "qdrant")]
    Qdrant,
    /// Cosine over vectors stored in the local corpus
    #[serde(rename = "local-vectors")]
    LocalVectors,
    /// Token overlap over the local corpus
    #[serde(rename = "local-bow")]
    LocalBow,
}

impl RetrievalProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qdrant => "qdrant",
            Self::LocalVectors => "local-vectors",
            Self::LocalBow => "local-bow",
        }
    }
}

impl std::fmt::Display for RetrievalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalQuery {
    pub text: String,
    pub limit: usize,
    pub filter: MetadataFilter,
}

impl RetrievalQuery {
    pub fn new(text: impl Into<String>, limit: usize) -> Self {
        Self {
            text: text.into(),
            limit,
            filter: MetadataFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: MetadataFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResults {
    pub hits: Vec<ScoredHit>,
    pub provider: RetrievalProvider,
}

/// Health snapshot of a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub backend: String,
    /// Whether searches currently reach their primary index
    pub healthy: bool,
    pub corpus_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Searchable, appendable corpus.
///
/// Implementations degrade instead of failing: an unreachable index or a
/// missing embedder falls back to the local ranking path. An empty corpus is
/// an empty result.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &RetrievalQuery) -> CoreResult<RetrievalResults>;

    /// Persist records, returning how many were written durably.
    async fn upsert(&self, records: &[CorpusRecord]) -> CoreResult<usize>;

    async fn health(&self) -> CoreResult<BackendHealth>;
}
