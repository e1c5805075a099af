//! What-if propagation of percent deltas up a metric tree.
//!
//! A delta of `0.05` means +5%. Every parent receives each child's
//! accumulated delta scaled by the edge weight, plus its own base delta.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Edge, Tree};

pub const DEFAULT_EDGE_WEIGHT: f64 = 0.2;

/// Contributions smaller than this are dropped from the breakdown.
const CONTRIBUTION_EPS: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propagation {
    pub by_id: BTreeMap<String, f64>,
    pub ns_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Node names from leaf to target, joined by ` → `
    pub path: String,
    pub contribution: f64,
}

fn weight_of(edge: &Edge, default_weight: f64) -> f64 {
    edge.weight.unwrap_or(default_weight)
}

fn base(deltas: &HashMap<String, f64>, id: &str) -> f64 {
    deltas.get(id).copied().unwrap_or(0.0)
}

struct Accumulator<'a> {
    children: HashMap<&'a str, Vec<&'a Edge>>,
    deltas: &'a HashMap<String, f64>,
    default_weight: f64,
    memo: HashMap<&'a str, f64>,
    visiting: HashSet<&'a str>,
}

impl<'a> Accumulator<'a> {
    fn accum(&mut self, id: &'a str) -> f64 {
        if let Some(v) = self.memo.get(id) {
            return *v;
        }
        // re-entry on a cycle
        if !self.visiting.insert(id) {
            return 0.0;
        }
        let kids = self.children.get(id).cloned().unwrap_or_default();
        let mut value = base(self.deltas, id);
        for e in kids {
            value += self.accum(e.src.as_str()) * weight_of(e, self.default_weight);
        }
        self.visiting.remove(id);
        self.memo.insert(id, value);
        value
    }
}

/// Propagate base deltas bottom-up to the North Star.
///
/// Nodes unreachable from the North Star report their base delta.
pub fn propagate(tree: &Tree, deltas: &HashMap<String, f64>, default_weight: f64) -> Propagation {
    let mut acc = Accumulator {
        children: tree.children(),
        deltas,
        default_weight,
        memo: HashMap::new(),
        visiting: HashSet::new(),
    };
    let ns_delta = acc.accum(tree.north_star.id.as_str());

    let mut by_id: BTreeMap<String, f64> = acc
        .memo
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    for n in &tree.nodes {
        by_id
            .entry(n.id.clone())
            .or_insert_with(|| base(deltas, &n.id));
    }

    Propagation { by_id, ns_delta }
}

fn display_name<'a>(names: &HashMap<&'a str, &'a str>, id: &'a str) -> &'a str {
    names.get(id).copied().unwrap_or(id)
}

/// One-level formula, e.g. `ARPU = Δ(ARPU) + 0.20×Trial → Paid conversion`.
pub fn symbolic_formula(tree: &Tree, node_id: &str, default_weight: f64) -> String {
    let names = tree.names();
    let name = display_name(&names, node_id);
    let children = tree.children();
    let kids = children.get(node_id).map(Vec::as_slice).unwrap_or_default();
    if kids.is_empty() {
        return format!("{name} = Δ({name})");
    }
    let parts: Vec<String> = kids
        .iter()
        .map(|e| {
            format!(
                "{:.2}×{}",
                weight_of(e, default_weight),
                display_name(&names, &e.src)
            )
        })
        .collect();
    format!("{name} = Δ({name}) + {}", parts.join(" + "))
}

/// Per-term breakdown of a node's delta in percentage points.
///
/// Uses the children's base deltas, not their propagated values.
pub fn numeric_expansion(
    tree: &Tree,
    node_id: &str,
    deltas: &HashMap<String, f64>,
    default_weight: f64,
) -> Vec<String> {
    let names = tree.names();
    let children = tree.children();
    let own = base(deltas, node_id);

    let mut lines = vec![format!(
        "Δ({}) = {:.2} pp",
        display_name(&names, node_id),
        own * 100.0
    )];
    for e in children.get(node_id).map(Vec::as_slice).unwrap_or_default() {
        let w = weight_of(e, default_weight);
        let d = base(deltas, &e.src);
        lines.push(format!(
            "{:.2} × {} ({:.2}%) = {:.2} pp",
            w,
            display_name(&names, &e.src),
            d * 100.0,
            w * d * 100.0
        ));
    }
    lines
}

/// Largest leaf-path contributions to `node_id`, plus its own delta.
///
/// A leaf's contribution is its base delta times the product of weights
/// along the path. Sorted by absolute contribution, largest first.
pub fn top_contributors(
    tree: &Tree,
    node_id: &str,
    deltas: &HashMap<String, f64>,
    default_weight: f64,
    limit: usize,
) -> Vec<Contribution> {
    let names = tree.names();
    let children = tree.children();
    let mut out = Vec::new();

    let own = base(deltas, node_id);
    if own.abs() > CONTRIBUTION_EPS {
        out.push(Contribution {
            path: display_name(&names, node_id).to_string(),
            contribution: own,
        });
    }

    // a childless target is already covered by its own delta
    if children.contains_key(node_id) {
        let mut path = vec![node_id];
        walk_leaves(
            &children,
            &names,
            deltas,
            default_weight,
            1.0,
            &mut path,
            &mut out,
        );
    }

    out.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    out.truncate(limit);
    out
}

fn walk_leaves<'a>(
    children: &HashMap<&'a str, Vec<&'a Edge>>,
    names: &HashMap<&'a str, &'a str>,
    deltas: &HashMap<String, f64>,
    default_weight: f64,
    acc_weight: f64,
    path: &mut Vec<&'a str>,
    out: &mut Vec<Contribution>,
) {
    let Some(curr) = path.last().copied() else {
        return;
    };
    let kids = children.get(curr).map(Vec::as_slice).unwrap_or_default();
    if kids.is_empty() {
        let c = acc_weight * base(deltas, curr);
        if c.abs() > CONTRIBUTION_EPS {
            let label: Vec<&str> = path.iter().rev().map(|id| display_name(names, id)).collect();
            out.push(Contribution {
                path: label.join(" → "),
                contribution: c,
            });
        }
        return;
    }
    for e in kids {
        let src = e.src.as_str();
        if path.contains(&src) {
            continue;
        }
        path.push(src);
        walk_leaves(
            children,
            names,
            deltas,
            default_weight,
            acc_weight * weight_of(e, default_weight),
            path,
            out,
        );
        path.pop();
    }
}
