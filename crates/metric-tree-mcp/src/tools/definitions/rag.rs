//! Retrieval and ingestion tool definitions.

use serde_json::{json, Map, Value};

use crate::tools::names;
use crate::tools::types::ToolDefinition;

/// Metadata properties shared by the ingest tools.
fn with_metadata(mut properties: Map<String, Value>) -> Map<String, Value> {
    properties.insert(
        "industry".into(),
        json!({"type": "string", "description": "Industry label stored with each chunk"}),
    );
    properties.insert(
        "stage".into(),
        json!({"type": "string", "description": "Stage label; known stages are stored canonically"}),
    );
    properties.insert(
        "tags".into(),
        json!({"type": "array", "items": {"type": "string"}, "default": []}),
    );
    properties
}

fn ingest_schema(field: &str, field_schema: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(field.to_string(), field_schema);
    json!({
        "type": "object",
        "properties": with_metadata(properties),
        "required": [field]
    })
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::RAG_SEARCH,
            "Search the playbook corpus. Uses the vector index when configured and falls back \
             to local cosine or token-overlap ranking.",
            json!({
                "type": "object",
                "properties": {
                    "q": {"type": "string", "minLength": 1, "description": "Query text (alias: query)"},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 100, "default": 8},
                    "industry": {"type": "string"},
                    "stage": {"type": "string"}
                },
                "required": ["q"]
            }),
        ),
        ToolDefinition::new(
            names::RAG_INGEST_TEXT,
            "Chunk, embed and store raw text in the playbook corpus.",
            ingest_schema("text", json!({"type": "string", "minLength": 1})),
        ),
        ToolDefinition::new(
            names::RAG_INGEST_FILE,
            "Ingest a local PDF or text file into the playbook corpus.",
            ingest_schema(
                "path",
                json!({"type": "string", "minLength": 1, "description": "Path readable by the server"}),
            ),
        ),
        ToolDefinition::new(
            names::RAG_INGEST_URL,
            "Fetch a web page or PDF over HTTP(S) and ingest its text.",
            ingest_schema(
                "url",
                json!({"type": "string", "format": "uri", "description": "http:// or https:// URL"}),
            ),
        ),
        ToolDefinition::new(
            names::RAG_INGEST_SEED,
            "Ingest the built-in starter playbooks.",
            json!({"type": "object", "properties": {}}),
        ),
    ]
}
