//! Liveness tool.

use serde_json::json;
use tracing::warn;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;

impl Handlers {
    /// `ok` is always true while the server answers. Backend trouble shows up
    /// in `retrieval.healthy` rather than failing the call.
    pub(crate) async fn call_health(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        let retrieval = match self.backend.health().await {
            Ok(h) => json!({
                "backend": h.backend,
                "healthy": h.healthy,
                "corpus_records": h.corpus_records,
                "detail": h.detail,
            }),
            Err(e) => {
                warn!(error = %e, "health: backend check failed");
                json!({
                    "backend": self.backend.name(),
                    "healthy": false,
                    "detail": e.to_string(),
                })
            }
        };

        self.tool_result(
            id,
            json!({
                "ok": true,
                "version": self.config.server.version,
                "retrieval": retrieval,
                "embedder": {
                    "model": self.embedder.model_id(),
                    "dimensions": self.embedder.dimensions(),
                    "ready": self.embedder.is_ready(),
                },
            }),
        )
    }
}
