//! MCP tool result helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;
use super::validate::Validate;

impl Handlers {
    /// MCP-compliant tool result helper.
    ///
    /// Wraps tool output in the required MCP format:
    /// ```json
    /// {
    ///   "content": [{"type": "text", "text": "..."}],
    ///   "isError": false
    /// }
    /// ```
    pub(crate) fn tool_result(
        &self,
        id: Option<JsonRpcId>,
        data: impl Serialize,
    ) -> JsonRpcResponse {
        let text = match serde_json::to_string(&data) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize tool output");
                return self.tool_error(id, &format!("Failed to serialize result: {}", e));
            }
        };
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{"type": "text", "text": text}],
                "isError": false
            }),
        )
    }

    /// MCP-compliant tool error helper.
    ///
    /// Returns an error response in MCP format:
    /// ```json
    /// {
    ///   "content": [{"type": "text", "text": "error message"}],
    ///   "isError": true
    /// }
    /// ```
    pub(crate) fn tool_error(&self, id: Option<JsonRpcId>, message: &str) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{"type": "text", "text": message}],
                "isError": true
            }),
        )
    }

    /// Deserialize tool arguments and run `validate()`.
    ///
    /// On failure the `Err` holds the finished `isError` response.
    pub(crate) fn parse_request<T>(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
        tool: &str,
    ) -> Result<T, JsonRpcResponse>
    where
        T: DeserializeOwned + Validate,
    {
        let request: T = serde_json::from_value(args).map_err(|e| {
            error!(error = %e, "{}: Failed to parse request", tool);
            self.tool_error(id.clone(), &format!("Invalid request: {}", e))
        })?;
        if let Err(e) = request.validate() {
            error!(error = %e, "{}: Validation failed", tool);
            return Err(self.tool_error(id, &e));
        }
        Ok(request)
    }
}
