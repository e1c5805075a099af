//! Retrieval and ingestion tool handlers.

use std::path::Path;

use metric_tree_core::retrieval::RetrievalQuery;
use metric_tree_ingest::{IngestOutcome, IngestResult};
use serde_json::json;
use tracing::{error, info, warn};

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;
use super::rag_dtos::{
    RagIngestFileRequest, RagIngestTextRequest, RagIngestUrlRequest, RagSearchRequest,
};

impl Handlers {
    /// Search the corpus. `limit` is capped at `retrieval.max_limit`.
    pub(crate) async fn call_rag_search(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: RagSearchRequest = match self.parse_request(id.clone(), args, "rag_search") {
            Ok(r) => r,
            Err(resp) => return resp,
        };

        let max = self.config.retrieval.max_limit;
        if request.limit > max {
            warn!(requested = request.limit, max, "rag_search: limit capped");
        }
        let query = RetrievalQuery::new(request.q.trim(), request.limit.min(max))
            .with_filter(request.filter());

        match self.backend.search(&query).await {
            Ok(out) => {
                info!(
                    query_preview = %request.q.chars().take(50).collect::<String>(),
                    hits = out.hits.len(),
                    provider = %out.provider,
                    "rag_search: done"
                );
                self.tool_result(
                    id,
                    json!({ "results": out.hits, "provider": out.provider }),
                )
            }
            Err(e) => {
                error!(error = %e, "rag_search: FAILED");
                self.tool_error(id, &format!("Search failed: {}", e))
            }
        }
    }

    pub(crate) async fn call_rag_ingest_text(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: RagIngestTextRequest =
            match self.parse_request(id.clone(), args, "rag_ingest_text") {
                Ok(r) => r,
                Err(resp) => return resp,
            };
        let outcome = self
            .ingest
            .ingest_text(&request.text, &request.metadata)
            .await;
        self.ingest_result(id, "rag_ingest_text", outcome)
    }

    pub(crate) async fn call_rag_ingest_file(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: RagIngestFileRequest =
            match self.parse_request(id.clone(), args, "rag_ingest_file") {
                Ok(r) => r,
                Err(resp) => return resp,
            };
        let outcome = self
            .ingest
            .ingest_file(Path::new(request.path.trim()), &request.metadata)
            .await;
        self.ingest_result(id, "rag_ingest_file", outcome)
    }

    pub(crate) async fn call_rag_ingest_url(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
    ) -> JsonRpcResponse {
        let request: RagIngestUrlRequest =
            match self.parse_request(id.clone(), args, "rag_ingest_url") {
                Ok(r) => r,
                Err(resp) => return resp,
            };
        let outcome = self
            .ingest
            .ingest_url(request.url.trim(), &request.metadata)
            .await;
        self.ingest_result(id, "rag_ingest_url", outcome)
    }

    pub(crate) async fn call_rag_ingest_seed(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        let outcome = self.ingest.ingest_seed_corpus().await;
        self.ingest_result(id, "rag_ingest_seed", outcome)
    }

    fn ingest_result(
        &self,
        id: Option<JsonRpcId>,
        tool: &str,
        outcome: IngestResult<IngestOutcome>,
    ) -> JsonRpcResponse {
        match outcome {
            Ok(outcome) => {
                info!(chunks = outcome.chunks, "{}: done", tool);
                self.tool_result(id, outcome)
            }
            Err(e) => {
                error!(error = %e, "{}: FAILED", tool);
                self.tool_error(id, &e.to_string())
            }
        }
    }
}
