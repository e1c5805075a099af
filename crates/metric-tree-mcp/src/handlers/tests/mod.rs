//! Handler tests over a real local corpus in a temp directory.

mod error_codes;
mod tools_list;

use std::sync::Arc;

use metric_tree_core::embeddings::{EmbeddingProvider, HashingEmbedder};
use metric_tree_core::Config;
use metric_tree_ingest::IngestionService;
use metric_tree_storage::build_backend;
use serde_json::Value;
use tempfile::TempDir;

use crate::handlers::Handlers;
use crate::protocol::{JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Handlers on the local backend; keep the `TempDir` alive for the test.
pub(crate) fn create_test_handlers() -> (Handlers, TempDir) {
    let tempdir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::default_config();
    config.storage.data_dir = tempdir.path().display().to_string();

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new());
    let backend = build_backend(&config, embedder.clone()).expect("backend");
    let ingest = IngestionService::new(embedder.clone(), backend.clone(), &config.ingest)
        .expect("ingest service");
    (
        Handlers::new(Arc::new(config), embedder, backend, ingest),
        tempdir,
    )
}

pub(crate) fn make_request(method: &str, id: Option<JsonRpcId>, params: Option<Value>) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id,
        method: method.to_string(),
        params,
    }
}

/// Call a tool and return `(isError, payload)`. Successful payloads are
/// parsed back from the text content; errors keep the message as a string.
pub(crate) async fn call_tool(handlers: &Handlers, name: &str, arguments: Value) -> (bool, Value) {
    let request = make_request(
        "tools/call",
        Some(JsonRpcId::Number(1)),
        Some(serde_json::json!({"name": name, "arguments": arguments})),
    );
    let response = handlers.dispatch(request).await.expect("response");
    tool_payload(response)
}

pub(crate) fn tool_payload(response: JsonRpcResponse) -> (bool, Value) {
    assert!(response.error.is_none(), "unexpected protocol error: {:?}", response.error);
    let result = response.result.expect("result");
    let is_error = result["isError"].as_bool().expect("isError");
    let text = result["content"][0]["text"].as_str().expect("text").to_string();
    if is_error {
        (true, Value::String(text))
    } else {
        (false, serde_json::from_str(&text).expect("json text"))
    }
}
