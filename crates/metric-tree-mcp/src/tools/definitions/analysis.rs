//! Analysis tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::ELASTICITIES_ESTIMATE,
            "Estimate how strongly each child series moves the parent series (OLS), \
             with optional clamping, normalization and 95% intervals.",
            json!({
                "type": "object",
                "properties": {
                    "parent": {"type": "array", "items": {"type": "number"}, "minItems": 1},
                    "children": {
                        "type": "object",
                        "additionalProperties": {"type": "array", "items": {"type": "number"}},
                        "description": "Child name to series, same length as parent"
                    },
                    "add_intercept": {"type": "boolean", "default": false},
                    "non_negative": {"type": "boolean", "default": true},
                    "normalize": {"type": "boolean", "default": true},
                    "ci": {"type": "boolean", "default": true}
                },
                "required": ["parent", "children"]
            }),
        ),
        ToolDefinition::new(
            names::IDEATE_METRICS,
            "Brainstorm candidate metrics per stage. The same diversity seed returns the same ideas.",
            json!({
                "type": "object",
                "properties": {
                    "industry": {"type": "string", "default": "SaaS B2B"},
                    "stage": {"type": "string", "description": "Limit ideas to one stage"},
                    "count": {"type": "integer", "minimum": 1, "maximum": 50, "default": 8},
                    "diversity": {"type": "integer", "minimum": 0, "default": 2}
                }
            }),
        ),
    ]
}
