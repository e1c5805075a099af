//! DTOs for the elasticity and ideation tools.

use metric_tree_core::elasticity::EstimateOptions;
use metric_tree_core::ideate::{DEFAULT_DIVERSITY, DEFAULT_IDEA_COUNT};
use metric_tree_core::{OrderedMap, Stage};
use serde::Deserialize;

use super::validate::Validate;

pub const MAX_IDEA_COUNT: usize = 50;

fn default_true() -> bool {
    true
}

fn default_count() -> usize {
    DEFAULT_IDEA_COUNT
}

fn default_diversity() -> u64 {
    DEFAULT_DIVERSITY
}

/// Request parameters for `elasticities_estimate`.
///
/// Series shape is checked by the estimator itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticitiesRequest {
    pub parent: Vec<f64>,
    pub children: OrderedMap<Vec<f64>>,
    #[serde(default)]
    pub add_intercept: bool,
    #[serde(default = "default_true")]
    pub non_negative: bool,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default = "default_true")]
    pub ci: bool,
}

impl ElasticitiesRequest {
    pub fn options(&self) -> EstimateOptions {
        EstimateOptions {
            add_intercept: self.add_intercept,
            non_negative: self.non_negative,
            normalize: self.normalize,
            compute_ci: self.ci,
        }
    }
}

impl Validate for ElasticitiesRequest {
    fn validate(&self) -> Result<(), String> {
        if self.parent.is_empty() {
            return Err("parent series must not be empty".into());
        }
        if self.children.is_empty() {
            return Err("children must contain at least one series".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdeateRequest {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_diversity")]
    pub diversity: u64,
}

impl IdeateRequest {
    /// Parsed stage; blank means all stages.
    pub fn stage(&self) -> Result<Option<Stage>, String> {
        match self.stage.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s
                .parse::<Stage>()
                .map(Some)
                .map_err(|e| e.client_message()),
            _ => Ok(None),
        }
    }
}

impl Validate for IdeateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.count == 0 || self.count > MAX_IDEA_COUNT {
            return Err(format!("count must be between 1 and {}", MAX_IDEA_COUNT));
        }
        self.stage().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_elasticity_flag_defaults() {
        let req: ElasticitiesRequest = serde_json::from_value(json!({
            "parent": [1.0, 2.0],
            "children": {"b": [1.0, 2.0], "a": [0.5, 1.0]}
        }))
        .unwrap();
        assert_eq!(req.options(), EstimateOptions::default());
        assert_eq!(req.children.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_children_rejected() {
        let req: ElasticitiesRequest =
            serde_json::from_value(json!({"parent": [1.0], "children": {}})).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_ideate_defaults_and_stage() {
        let req: IdeateRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.count, DEFAULT_IDEA_COUNT);
        assert_eq!(req.diversity, DEFAULT_DIVERSITY);
        assert_eq!(req.stage().unwrap(), None);

        let req: IdeateRequest =
            serde_json::from_value(json!({"stage": "retention", "count": 3})).unwrap();
        assert_eq!(req.stage().unwrap(), Some(Stage::Retention));

        let req: IdeateRequest = serde_json::from_value(json!({"stage": "growth"})).unwrap();
        assert!(req.validate().is_err());
    }
}
