//! Metric trees: a North Star decomposed into driver metrics.
//!
//! Edges point from a driver (`src`) to the metric it moves (`dst`). The
//! North Star is also listed in `nodes` by the expander, but callers may omit
//! it.

mod expand;
mod forecast;
mod lint;
mod propagate;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::playbook::Stage;

pub use expand::{expand_tree, ROOT_ID};
pub use forecast::{linreg_forecast, pct_change, Forecast, ForecastPoint, SeriesPoint, DEFAULT_HORIZON};
pub use lint::{lint_tree, VANITY_TERMS};
pub use propagate::{
    numeric_expansion, propagate, symbolic_formula, top_contributors, Contribution, Propagation,
    DEFAULT_EDGE_WEIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The North Star
    Focus,
    /// A driver metric
    Input,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Sum,
    Product,
    Ratio,
    #[default]
    Influences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub level: u32,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub guardrails: Option<Vec<String>>,
    #[serde(default)]
    pub counter_metrics: Option<Vec<String>>,
}

impl Node {
    /// Driver node with everything optional left empty.
    pub fn input(id: &str, name: &str, level: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            node_type: NodeType::Input,
            level,
            formula: None,
            owner: None,
            window: None,
            stage: None,
            guardrails: None,
            counter_metrics: None,
        }
    }

    pub fn with_formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    #[serde(default)]
    pub relation: Relation,
    /// Propagation weight; the default weight applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    pub fn new(src: &str, dst: &str) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            relation: Relation::default(),
            weight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub north_star: Node,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Tree {
    /// Display names by id, the North Star included.
    pub fn names(&self) -> HashMap<&str, &str> {
        let mut names = HashMap::with_capacity(self.nodes.len() + 1);
        names.insert(self.north_star.id.as_str(), self.north_star.name.as_str());
        for n in &self.nodes {
            names.insert(n.id.as_str(), n.name.as_str());
        }
        names
    }

    /// Incoming edges per parent id, in edge order.
    pub fn children(&self) -> HashMap<&str, Vec<&Edge>> {
        let mut map: HashMap<&str, Vec<&Edge>> = HashMap::new();
        for e in &self.edges {
            map.entry(e.dst.as_str()).or_default().push(e);
        }
        map
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        if self.north_star.id == id {
            return Some(&self.north_star);
        }
        self.nodes.iter().find(|n| n.id == id)
    }
}
