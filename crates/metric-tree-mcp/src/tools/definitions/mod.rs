//! Tool definitions.
//!
//! 14 tools exposed:
//! - Tree (7): health, suggest_north_star, expand_tree, lint_tree, explain,
//!   propagate_deltas, forecast_series
//! - RAG (5): rag_search, rag_ingest_text, rag_ingest_file, rag_ingest_url, rag_ingest_seed
//! - Analysis (2): elasticities_estimate, ideate_metrics

pub(crate) mod analysis;
pub(crate) mod rag;
pub(crate) mod tree;

use crate::tools::types::ToolDefinition;

/// Get all tool definitions for the `tools/list` response.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    let mut tools = Vec::with_capacity(14);
    tools.extend(tree::definitions());
    tools.extend(rag::definitions());
    tools.extend(analysis::definitions());
    tools
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::tools::names;

    #[test]
    fn test_total_tool_count() {
        assert_eq!(get_tool_definitions().len(), 14);
    }

    #[test]
    fn test_all_tool_names_present() {
        let tools = get_tool_definitions();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        for expected in [
            names::HEALTH,
            names::SUGGEST_NORTH_STAR,
            names::EXPAND_TREE,
            names::LINT_TREE,
            names::EXPLAIN,
            names::PROPAGATE_DELTAS,
            names::FORECAST_SERIES,
            names::RAG_SEARCH,
            names::RAG_INGEST_TEXT,
            names::RAG_INGEST_FILE,
            names::RAG_INGEST_URL,
            names::RAG_INGEST_SEED,
            names::ELASTICITIES_ESTIMATE,
            names::IDEATE_METRICS,
        ] {
            assert!(names.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_schemas_are_objects_with_known_required_fields() {
        for tool in get_tool_definitions() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{}", tool.name);
            let properties = schema["properties"].as_object().unwrap();
            if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
                for field in required {
                    let field = field.as_str().unwrap();
                    assert!(properties.contains_key(field), "{}: {}", tool.name, field);
                }
            }
        }
    }

    #[test]
    fn test_serializes_input_schema_in_camel_case() {
        let value = serde_json::to_value(&get_tool_definitions()[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }
}
