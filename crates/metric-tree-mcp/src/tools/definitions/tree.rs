//! Tree tool definitions.
//!
//! Tools: health, suggest_north_star, expand_tree, lint_tree, explain,
//! propagate_deltas, forecast_series

use serde_json::{json, Value};

use crate::tools::names;
use crate::tools::types::ToolDefinition;

const STAGES: [&str; 7] = [
    "Adoption",
    "Acquisition",
    "Activation",
    "Engagement",
    "Retention",
    "Referral",
    "Revenue",
];

/// Schema of a metric tree as returned by `expand_tree`.
pub(crate) fn tree_schema() -> Value {
    let node = json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "name": {"type": "string"},
            "type": {"type": "string", "enum": ["focus", "input"]},
            "level": {"type": "integer", "minimum": 0},
            "formula": {"type": ["string", "null"]},
            "owner": {"type": ["string", "null"]},
            "window": {"type": ["string", "null"]},
            "stage": {"type": ["string", "null"], "enum": [
                "Adoption", "Activation", "Engagement", "Retention", "Referral", "Revenue", null
            ]}
        },
        "required": ["id", "name", "type", "level"]
    });
    json!({
        "type": "object",
        "properties": {
            "north_star": node,
            "nodes": {"type": "array", "items": node},
            "edges": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "src": {"type": "string", "description": "Driver node id"},
                        "dst": {"type": "string", "description": "Node id the driver moves"},
                        "relation": {
                            "type": "string",
                            "enum": ["sum", "product", "ratio", "influences"],
                            "default": "influences"
                        },
                        "weight": {"type": "number"}
                    },
                    "required": ["src", "dst"]
                }
            }
        },
        "required": ["north_star", "nodes", "edges"]
    })
}

fn emphasis_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": {"type": "number", "minimum": 0, "maximum": 10},
        "description": "Stage name to 0-10 emphasis; Revenue above 7 favours a monetization-weighted North Star"
    })
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::HEALTH,
            "Liveness check. Reports the retrieval backend, corpus size and embedder readiness.",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            names::SUGGEST_NORTH_STAR,
            "Suggest up to three North Star metric candidates for an industry, \
             each with rationale, tradeoffs and a measurement window.",
            json!({
                "type": "object",
                "properties": {
                    "industry": {
                        "type": "string",
                        "minLength": 1,
                        "description": "Industry, e.g. 'SaaS B2B', 'eCommerce', 'Streaming media'"
                    },
                    "product_type": {"type": "string", "default": ""},
                    "emphasis": emphasis_schema()
                },
                "required": ["industry"]
            }),
        ),
        ToolDefinition::new(
            names::EXPAND_TREE,
            "Expand a North Star into a two-level driver tree using the industry template. \
             Without north_star, the first suggested candidate is used.",
            json!({
                "type": "object",
                "properties": {
                    "industry": {"type": "string", "minLength": 1},
                    "product_type": {"type": "string", "default": ""},
                    "north_star": {"type": "string", "description": "North Star metric name"},
                    "emphasis": emphasis_schema()
                },
                "required": ["industry"]
            }),
        ),
        ToolDefinition::new(
            names::LINT_TREE,
            "Check a metric tree for missing owners or windows, vanity metrics, \
             orphan nodes and leaves that are not inputs.",
            json!({
                "type": "object",
                "properties": {"tree": tree_schema()},
                "required": ["tree"]
            }),
        ),
        ToolDefinition::new(
            names::EXPLAIN,
            "Explain why a metric matters and how to move and measure it, with a counter-metric, \
             owners and team actions. With use_rag, adds moves mined from the playbook corpus.",
            json!({
                "type": "object",
                "properties": {
                    "node": {"type": "string", "minLength": 1, "description": "Metric name"},
                    "parent": {"type": "string", "description": "Name of the metric it drives"},
                    "use_rag": {"type": "boolean", "default": false},
                    "industry": {"type": "string"},
                    "stage": {
                        "type": "string",
                        "enum": STAGES,
                        "description": "Inferred from the metric name when omitted"
                    }
                },
                "required": ["node"]
            }),
        ),
        ToolDefinition::new(
            names::PROPAGATE_DELTAS,
            "Propagate percent deltas (0.05 = +5%) from drivers up to the North Star. \
             With focus_node, also returns its formula, per-term expansion and top contributing paths.",
            json!({
                "type": "object",
                "properties": {
                    "tree": tree_schema(),
                    "deltas": {
                        "type": "object",
                        "additionalProperties": {"type": "number"},
                        "description": "Node id to base delta"
                    },
                    "default_weight": {"type": "number", "default": 0.2},
                    "focus_node": {"type": "string", "description": "Node id to break down"},
                    "top_k": {"type": "integer", "minimum": 1, "maximum": 50, "default": 5}
                },
                "required": ["tree", "deltas"]
            }),
        ),
        ToolDefinition::new(
            names::FORECAST_SERIES,
            "Fit a linear trend to a weekly series and project it forward.",
            json!({
                "type": "object",
                "properties": {
                    "series": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "t": {"type": "string", "description": "ISO date YYYY-MM-DD"},
                                "y": {"type": "number"}
                            },
                            "required": ["t", "y"]
                        }
                    },
                    "horizon": {"type": "integer", "minimum": 1, "maximum": 104, "default": 8}
                },
                "required": ["series"]
            }),
        ),
    ]
}
