//! DTOs for the tree tools.

use std::collections::HashMap;

use metric_tree_core::playbook::ExplainRequest;
use metric_tree_core::tree::{SeriesPoint, Tree, DEFAULT_EDGE_WEIGHT, DEFAULT_HORIZON};
use metric_tree_core::Stage;
use serde::Deserialize;

use super::validate::Validate;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default number of contributing paths for `focus_node`.
pub const DEFAULT_TOP_K: usize = 5;

pub const MAX_TOP_K: usize = 50;

/// Two years of weekly points.
pub const MAX_HORIZON: usize = 104;

fn default_edge_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("Missing {}", field))
    } else {
        Ok(())
    }
}

fn validate_stage(stage: Option<&str>) -> Result<(), String> {
    match stage.map(str::trim) {
        Some(s) if !s.is_empty() => s
            .parse::<Stage>()
            .map(|_| ())
            .map_err(|e| e.client_message()),
        _ => Ok(()),
    }
}

fn validate_emphasis(emphasis: Option<&HashMap<String, f64>>) -> Result<(), String> {
    if let Some((stage, _)) = emphasis
        .into_iter()
        .flatten()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(format!("emphasis for '{}' must be a finite number", stage));
    }
    Ok(())
}

// ============================================================================
// REQUEST DTOs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestNorthStarRequest {
    pub industry: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub emphasis: Option<HashMap<String, f64>>,
}

impl Validate for SuggestNorthStarRequest {
    fn validate(&self) -> Result<(), String> {
        require("industry", &self.industry)?;
        validate_emphasis(self.emphasis.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpandTreeRequest {
    pub industry: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub north_star: Option<String>,
    #[serde(default)]
    pub emphasis: Option<HashMap<String, f64>>,
}

impl ExpandTreeRequest {
    /// Explicit North Star, or none when blank.
    pub fn north_star(&self) -> Option<&str> {
        self.north_star
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Validate for ExpandTreeRequest {
    fn validate(&self) -> Result<(), String> {
        require("industry", &self.industry)?;
        validate_emphasis(self.emphasis.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintTreeRequest {
    pub tree: Tree,
}

impl Validate for LintTreeRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for ExplainRequest {
    fn validate(&self) -> Result<(), String> {
        require("node", &self.node)?;
        validate_stage(self.stage.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropagateDeltasRequest {
    pub tree: Tree,
    #[serde(default)]
    pub deltas: HashMap<String, f64>,
    #[serde(default = "default_edge_weight")]
    pub default_weight: f64,
    #[serde(default)]
    pub focus_node: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Validate for PropagateDeltasRequest {
    fn validate(&self) -> Result<(), String> {
        if !self.default_weight.is_finite() {
            return Err("default_weight must be a finite number".into());
        }
        if let Some((id, _)) = self.deltas.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("delta for '{}' must be a finite number", id));
        }
        if let Some(e) = self
            .tree
            .edges
            .iter()
            .find(|e| e.weight.is_some_and(|w| !w.is_finite()))
        {
            return Err(format!("weight on edge {} -> {} must be finite", e.src, e.dst));
        }
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(format!("top_k must be between 1 and {}", MAX_TOP_K));
        }
        if let Some(focus) = &self.focus_node {
            if self.tree.node(focus).is_none() {
                return Err(format!("focus_node '{}' is not in the tree", focus));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSeriesRequest {
    pub series: Vec<SeriesPoint>,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
}

impl Validate for ForecastSeriesRequest {
    fn validate(&self) -> Result<(), String> {
        if self.series.is_empty() {
            return Err("series must contain at least one point".into());
        }
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(format!("horizon must be between 1 and {}", MAX_HORIZON));
        }
        Ok(())
    }
}
