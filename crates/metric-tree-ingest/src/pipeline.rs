//! Extract, chunk, embed, and store.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use metric_tree_core::config::IngestConfig;
use metric_tree_core::embeddings::EmbeddingProvider;
use metric_tree_core::retrieval::{CorpusRecord, RetrievalBackend};
use metric_tree_core::{CoreError, Stage};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::chunker::DocumentChunker;
use crate::fetch::DocumentFetcher;
use crate::html::html_to_text;
use crate::pdf::PdfExtractor;
use crate::seed::SEED_DOCS;
use crate::{IngestError, IngestResult};

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestSource {
    Text,
    File,
    Url,
    Seed,
}

impl IngestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
            Self::Url => "url",
            Self::Seed => "seed",
        }
    }
}

/// Labels attached to every chunk of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestMetadata {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl IngestMetadata {
    /// Drop blank values. Recognized stage labels are stored in their
    /// canonical spelling so that stage filters match.
    fn normalized(&self) -> Self {
        let keep = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            industry: keep(&self.industry),
            stage: keep(&self.stage).map(|s| Stage::canonical_label(&s)),
            tags: self
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Result of one ingestion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub ok: bool,
    pub chunks: usize,
    pub ids: Vec<String>,
}

#[derive(Debug, Default)]
struct Provenance<'a> {
    url: Option<&'a str>,
    filename: Option<&'a str>,
}

/// Ingestion pipeline over an injected embedder and backend.
pub struct IngestionService {
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn RetrievalBackend>,
    chunker: DocumentChunker,
    fetcher: DocumentFetcher,
    pdf: PdfExtractor,
    max_bytes: usize,
}

impl IngestionService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn RetrievalBackend>,
        config: &IngestConfig,
    ) -> IngestResult<Self> {
        Ok(Self {
            embedder,
            backend,
            chunker: DocumentChunker::from_config(config),
            fetcher: DocumentFetcher::from_config(config)?,
            pdf: PdfExtractor::new(),
            max_bytes: config.max_document_bytes,
        })
    }

    /// Ingest raw text.
    #[instrument(skip(self, text, metadata), fields(chars = text.len()))]
    pub async fn ingest_text(
        &self,
        text: &str,
        metadata: &IngestMetadata,
    ) -> IngestResult<IngestOutcome> {
        self.store(text, IngestSource::Text, metadata, Provenance::default())
            .await
    }

    /// Ingest a local file. `.pdf` files go through the PDF extractor;
    /// anything else is read as UTF-8, replacing invalid sequences.
    #[instrument(skip(self, path, metadata), fields(path = %path.display()))]
    pub async fn ingest_file(
        &self,
        path: &Path,
        metadata: &IngestMetadata,
    ) -> IngestResult<IngestOutcome> {
        let size = tokio::fs::metadata(path).await?.len() as usize;
        if size > self.max_bytes {
            return Err(IngestError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.ingest_bytes(&filename, &bytes, metadata).await
    }

    /// Ingest an in-memory file body named `filename`.
    pub async fn ingest_bytes(
        &self,
        filename: &str,
        bytes: &[u8],
        metadata: &IngestMetadata,
    ) -> IngestResult<IngestOutcome> {
        let text = if filename.to_lowercase().ends_with(".pdf") {
            self.pdf.extract_text(bytes)?
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };
        let provenance = Provenance {
            filename: Some(filename),
            ..Provenance::default()
        };
        self.store(&text, IngestSource::File, metadata, provenance)
            .await
    }

    /// Fetch and ingest a web page or remote PDF.
    #[instrument(skip(self, metadata))]
    pub async fn ingest_url(
        &self,
        url: &str,
        metadata: &IngestMetadata,
    ) -> IngestResult<IngestOutcome> {
        let doc = self.fetcher.fetch(url).await?;
        let text = if doc.is_pdf() {
            self.pdf.extract_text(&doc.bytes)?
        } else {
            html_to_text(&String::from_utf8_lossy(&doc.bytes))
        };
        let provenance = Provenance {
            url: Some(url),
            ..Provenance::default()
        };
        self.store(&text, IngestSource::Url, metadata, provenance)
            .await
    }

    /// Ingest the built-in starter playbooks. Each call appends a fresh copy.
    #[instrument(skip(self))]
    pub async fn ingest_seed_corpus(&self) -> IngestResult<IngestOutcome> {
        let mut ids = Vec::new();
        for doc in &SEED_DOCS {
            let metadata = IngestMetadata {
                industry: doc.industry.map(str::to_string),
                stage: Some(doc.stage.as_str().to_string()),
                tags: vec!["seed".to_string(), doc.id.to_string()],
            };
            let outcome = self
                .store(doc.text, IngestSource::Seed, &metadata, Provenance::default())
                .await?;
            ids.extend(outcome.ids);
        }
        Ok(IngestOutcome {
            ok: true,
            chunks: ids.len(),
            ids,
        })
    }

    async fn store(
        &self,
        text: &str,
        source: IngestSource,
        metadata: &IngestMetadata,
        provenance: Provenance<'_>,
    ) -> IngestResult<IngestOutcome> {
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(IngestError::NoText);
        }

        let vectors = self.embedder.embed_batch(&chunks).await?;
        if vectors.len() != chunks.len() {
            return Err(CoreError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            ))
            .into());
        }

        let metadata = metadata.normalized();
        let now = Utc::now();
        let records: Vec<CorpusRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| CorpusRecord {
                source: Some(source.as_str().to_string()),
                url: provenance.url.map(str::to_string),
                filename: provenance.filename.map(str::to_string),
                industry: metadata.industry.clone(),
                stage: metadata.stage.clone(),
                tags: metadata.tags.clone(),
                ingested_at: Some(now),
                ..CorpusRecord::new(Uuid::new_v4().to_string(), chunk).with_vector(vector)
            })
            .collect();

        let written = self.backend.upsert(&records).await?;
        let ids: Vec<String> = records.into_iter().map(|r| r.id).collect();
        info!(
            source = source.as_str(),
            chunks = ids.len(),
            written,
            backend = self.backend.name(),
            "Ingested document"
        );

        Ok(IngestOutcome {
            ok: true,
            chunks: ids.len(),
            ids,
        })
    }
}
