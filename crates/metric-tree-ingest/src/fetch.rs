//! HTTP retrieval of remote documents.

use std::time::Duration;

use metric_tree_core::config::IngestConfig;
use tracing::{debug, instrument};

use crate::pdf::PdfExtractor;
use crate::{IngestError, IngestResult};

/// A downloaded document body.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedDocument {
    /// PDF by content type, a `.pdf` URL suffix, or the `%PDF-` header.
    pub fn is_pdf(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_lowercase().contains("pdf"));
        by_type
            || self.url.to_lowercase().ends_with(".pdf")
            || PdfExtractor::looks_like_pdf(&self.bytes)
    }
}

/// GET client with a fixed timeout and body size cap.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Fetch(e.to_string()))?;
        Ok(Self { client, max_bytes })
    }

    pub fn from_config(config: &IngestConfig) -> IngestResult<Self> {
        Self::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_document_bytes,
        )
    }

    /// Download `url`. Non-2xx statuses are fetch failures.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> IngestResult<FetchedDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        if let Some(len) = response.content_length() {
            if len as usize > self.max_bytes {
                return Err(IngestError::TooLarge {
                    size: len as usize,
                    max: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;
        if bytes.len() > self.max_bytes {
            return Err(IngestError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        debug!(
            bytes = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            "Fetched document"
        );
        Ok(FetchedDocument {
            url: url.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
