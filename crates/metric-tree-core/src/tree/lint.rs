//! Tree lint rules.

use std::collections::HashSet;

use super::{Node, NodeType, Tree};

/// Names containing any of these are likely vanity metrics.
pub const VANITY_TERMS: [&str; 6] = [
    "page views",
    "impressions",
    "likes",
    "followers",
    "downloads",
    "time on site",
];

/// Run every rule and collect the warnings.
///
/// Order: vanity metrics, then missing owner/window (North Star first), then
/// unlinked nodes. Each group follows node order.
pub fn lint_tree(tree: &Tree) -> Vec<String> {
    let mut warnings = Vec::new();
    let root_id = tree.north_star.id.as_str();

    for n in &tree.nodes {
        let lower = n.name.to_lowercase();
        if n.node_type == NodeType::Input && VANITY_TERMS.iter().any(|v| lower.contains(v)) {
            warnings.push(format!(
                "Possible vanity metric: '{}'. Ensure it's a controllable driver.",
                n.name
            ));
        }
    }

    let owned = std::iter::once(&tree.north_star).chain(tree.nodes.iter().filter(|n| n.id != root_id));
    for n in owned {
        for (field, value) in required_fields(n) {
            if value.map_or(true, str::is_empty) {
                warnings.push(format!("Missing '{}' on node '{}'.", field, n.name));
            }
        }
    }

    let linked: HashSet<&str> = tree
        .edges
        .iter()
        .flat_map(|e| [e.src.as_str(), e.dst.as_str()])
        .collect();
    for n in &tree.nodes {
        if n.id != root_id && !linked.contains(n.id.as_str()) {
            warnings.push(format!("Unlinked node '{}'.", n.name));
        }
    }

    warnings
}

fn required_fields(n: &Node) -> [(&'static str, Option<&str>); 2] {
    [("owner", n.owner.as_deref()), ("window", n.window.as_deref())]
}
