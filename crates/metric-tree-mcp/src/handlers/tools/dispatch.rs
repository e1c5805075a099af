//! Tool dispatch logic for MCP tool calls.

use serde_json::json;
use tracing::debug;

use crate::protocol::{error_codes, JsonRpcId, JsonRpcResponse};
use crate::tools::{get_tool_definitions, tool_names};

use super::super::Handlers;

impl Handlers {
    pub(crate) fn handle_tools_list(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        debug!("Handling tools/list request");
        let tools = get_tool_definitions();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    pub(crate) async fn handle_tools_call(
        &self,
        id: Option<JsonRpcId>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing params for tools/call",
                );
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n,
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing 'name' parameter in tools/call",
                );
            }
        };

        let arguments = match params.get("arguments") {
            None | Some(serde_json::Value::Null) => json!({}),
            Some(args) if args.is_object() => args.clone(),
            Some(_) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "'arguments' must be an object",
                );
            }
        };

        debug!("Calling tool: {} with arguments: {:?}", tool_name, arguments);

        match tool_name {
            tool_names::HEALTH => self.call_health(id).await,

            // ========== TREE TOOLS ==========
            tool_names::SUGGEST_NORTH_STAR => self.call_suggest_north_star(id, arguments),
            tool_names::EXPAND_TREE => self.call_expand_tree(id, arguments),
            tool_names::LINT_TREE => self.call_lint_tree(id, arguments),
            tool_names::EXPLAIN => self.call_explain(id, arguments).await,
            tool_names::PROPAGATE_DELTAS => self.call_propagate_deltas(id, arguments),
            tool_names::FORECAST_SERIES => self.call_forecast_series(id, arguments),

            // ========== RAG TOOLS ==========
            tool_names::RAG_SEARCH => self.call_rag_search(id, arguments).await,
            tool_names::RAG_INGEST_TEXT => self.call_rag_ingest_text(id, arguments).await,
            tool_names::RAG_INGEST_FILE => self.call_rag_ingest_file(id, arguments).await,
            tool_names::RAG_INGEST_URL => self.call_rag_ingest_url(id, arguments).await,
            tool_names::RAG_INGEST_SEED => self.call_rag_ingest_seed(id).await,

            // ========== ANALYSIS TOOLS ==========
            tool_names::ELASTICITIES_ESTIMATE => self.call_elasticities_estimate(id, arguments),
            tool_names::IDEATE_METRICS => self.call_ideate_metrics(id, arguments),

            _ => JsonRpcResponse::error(
                id,
                error_codes::TOOL_NOT_FOUND,
                format!("Unknown tool: {}", tool_name),
            ),
        }
    }
}
