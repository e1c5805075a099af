//! DTOs for retrieval and ingestion tools.

use metric_tree_core::retrieval::MetadataFilter;
use metric_tree_ingest::IngestMetadata;
use serde::Deserialize;

use super::validate::Validate;

/// Default hit count for `rag_search`.
pub const DEFAULT_RAG_LIMIT: usize = 8;

fn default_limit() -> usize {
    DEFAULT_RAG_LIMIT
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Request parameters for `rag_search`.
///
/// ```json
/// {"q": "activation checklist", "limit": 5, "industry": "SaaS B2B"}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RagSearchRequest {
    #[serde(alias = "query")]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

impl RagSearchRequest {
    pub fn filter(&self) -> MetadataFilter {
        MetadataFilter::new(blank_to_none(&self.industry), blank_to_none(&self.stage))
    }
}

impl Validate for RagSearchRequest {
    fn validate(&self) -> Result<(), String> {
        if self.q.trim().is_empty() {
            return Err("Missing q".into());
        }
        if self.limit == 0 {
            return Err("limit must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagIngestTextRequest {
    pub text: String,
    #[serde(flatten)]
    pub metadata: IngestMetadata,
}

impl Validate for RagIngestTextRequest {
    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Missing text".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagIngestFileRequest {
    pub path: String,
    #[serde(flatten)]
    pub metadata: IngestMetadata,
}

impl Validate for RagIngestFileRequest {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("Missing path".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagIngestUrlRequest {
    pub url: String,
    #[serde(flatten)]
    pub metadata: IngestMetadata,
}

impl Validate for RagIngestUrlRequest {
    fn validate(&self) -> Result<(), String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err("Missing url".into());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("Unsupported URL scheme: {}", url));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_accepts_query_alias() {
        let req: RagSearchRequest =
            serde_json::from_value(json!({"query": "invite flows", "stage": " "})).unwrap();
        assert_eq!(req.q, "invite flows");
        assert_eq!(req.limit, DEFAULT_RAG_LIMIT);
        assert_eq!(req.filter(), MetadataFilter::default());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_ingest_metadata_is_flattened() {
        let req: RagIngestTextRequest = serde_json::from_value(json!({
            "text": "hello",
            "industry": "SaaS B2B",
            "tags": ["a"]
        }))
        .unwrap();
        assert_eq!(req.metadata.industry.as_deref(), Some("SaaS B2B"));
        assert_eq!(req.metadata.tags, vec!["a"]);
        assert!(req.metadata.stage.is_none());
    }

    #[test]
    fn test_url_scheme_checked() {
        let req: RagIngestUrlRequest =
            serde_json::from_value(json!({"url": "file:///etc/passwd"})).unwrap();
        assert!(req.validate().unwrap_err().contains("scheme"));
    }
}
