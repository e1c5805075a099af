//! Template expansion of a North Star into a two-level driver tree.

use tracing::debug;

use super::{Edge, Node, NodeType, Tree};
use crate::playbook::Stage;

pub const ROOT_ID: &str = "ns";

fn is_subscription_north_star(north_star: &str) -> bool {
    north_star.to_lowercase().contains("subscriber") || north_star.contains("WAS")
}

/// Expand `north_star` into a tree.
///
/// Subscription North Stars ("subscriber" in any case, or the literal "WAS")
/// get the streaming template; everything else gets the product-led default.
/// `industry` is accepted for API symmetry and does not change the template.
pub fn expand_tree(north_star: &str, industry: &str) -> Tree {
    let root = Node {
        id: ROOT_ID.to_string(),
        name: north_star.to_string(),
        node_type: NodeType::Focus,
        level: 0,
        formula: None,
        owner: Some("Growth PM".to_string()),
        window: Some("7d".to_string()),
        stage: None,
        guardrails: None,
        counter_metrics: None,
    };

    let (l1, l2, l2_links) = if is_subscription_north_star(north_star) {
        streaming_template()
    } else {
        default_template()
    };

    let mut edges: Vec<Edge> = l1.iter().map(|n| Edge::new(&n.id, ROOT_ID)).collect();
    edges.extend(l2_links.iter().map(|(src, dst)| Edge::new(src, dst)));

    let mut nodes = Vec::with_capacity(1 + l1.len() + l2.len());
    nodes.push(root.clone());
    nodes.extend(l1);
    nodes.extend(l2);

    debug!(
        north_star,
        industry,
        nodes = nodes.len(),
        edges = edges.len(),
        "Expanded metric tree"
    );

    Tree {
        north_star: root,
        nodes,
        edges,
    }
}

type Template = (Vec<Node>, Vec<Node>, [(&'static str, &'static str); 3]);

fn streaming_template() -> Template {
    let mut retention = Node::input("l1_ret", "7-day Retention", 1)
        .with_formula("retained_7d / active_7d")
        .with_stage(Stage::Retention);
    retention.guardrails = Some(vec!["new user experience quality".to_string()]);
    retention.counter_metrics = Some(vec!["spam_rate".to_string()]);

    let l1 = vec![
        retention,
        Node::input("l1_eng", "Minutes viewed / WAS", 1)
            .with_formula("total_minutes / WAS")
            .with_stage(Stage::Engagement),
        Node::input("l1_arpu", "ARPU", 1)
            .with_formula("revenue / subscribers")
            .with_stage(Stage::Revenue),
    ];
    let l2 = vec![
        Node::input("l2_same_show", "Same-show retention", 2).with_stage(Stage::Retention),
        Node::input("l2_completion", "Completion rate", 2).with_stage(Stage::Engagement),
        Node::input("l2_trial_conv", "Trial → Paid conversion", 2).with_stage(Stage::Revenue),
    ];
    let links = [
        ("l2_same_show", "l1_ret"),
        ("l2_completion", "l1_eng"),
        ("l2_trial_conv", "l1_arpu"),
    ];
    (l1, l2, links)
}

fn default_template() -> Template {
    let l1 = vec![
        Node::input("l1_act", "Activation rate (FTUX)", 1)
            .with_formula("activated_users / signups")
            .with_stage(Stage::Activation),
        Node::input("l1_7dret", "7-day retention", 1)
            .with_formula("retained_7d / active_7d")
            .with_stage(Stage::Retention),
        Node::input("l1_depth", "Core feature adoption %", 1)
            .with_formula("users_used_core / WAU")
            .with_stage(Stage::Engagement),
        Node::input("l1_ref", "Referral rate", 1)
            .with_formula("referrals / WAU")
            .with_stage(Stage::Referral),
        Node::input("l1_arpu", "ARPU", 1)
            .with_formula("revenue / actives")
            .with_stage(Stage::Revenue),
    ];
    let l2 = vec![
        Node::input("l2_onboard", "Onboarding completion", 2).with_stage(Stage::Activation),
        Node::input("l2_freq", "Sessions / WAU", 2).with_stage(Stage::Engagement),
        Node::input("l2_nps", "NPS", 2).with_stage(Stage::Retention),
    ];
    let links = [
        ("l2_onboard", "l1_act"),
        ("l2_freq", "l1_depth"),
        ("l2_nps", "l1_7dret"),
    ];
    (l1, l2, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::lint_tree;

    #[test]
    fn test_default_template_shape() {
        let tree = expand_tree("Weekly Active Accounts (WAA)", "SaaS B2B");

        assert_eq!(tree.north_star.id, "ns");
        assert_eq!(tree.north_star.owner.as_deref(), Some("Growth PM"));
        assert_eq!(tree.north_star.window.as_deref(), Some("7d"));
        assert_eq!(tree.nodes.len(), 9);
        assert_eq!(tree.nodes.iter().filter(|n| n.level == 1).count(), 5);
        assert_eq!(tree.nodes.iter().filter(|n| n.level == 2).count(), 3);
        assert_eq!(tree.edges.len(), 8);
        assert_eq!(tree.nodes[1].id, "l1_act");
        assert_eq!(tree.nodes[1].stage, Some(Stage::Activation));
    }

    #[test]
    fn test_subscriber_north_star_uses_streaming_template() {
        for name in ["Weekly Active Subscribers", "WAS", "paying SUBSCRIBERS"] {
            let tree = expand_tree(name, "Streaming");
            assert_eq!(tree.nodes.len(), 7, "{}", name);
            assert_eq!(tree.nodes[1].id, "l1_ret");
            assert_eq!(
                tree.nodes[1].counter_metrics,
                Some(vec!["spam_rate".to_string()])
            );
        }
    }

    #[test]
    fn test_was_match_is_case_sensitive() {
        // lowercase "was" is not the acronym
        let tree = expand_tree("Users who was active", "Media");
        assert_eq!(tree.nodes.len(), 9);
    }

    #[test]
    fn test_expanded_tree_is_linked() {
        let tree = expand_tree("Weekly Engaged Users (WEU)", "Fintech");
        let warnings = lint_tree(&tree);
        assert!(
            warnings.iter().all(|w| !w.starts_with("Unlinked")),
            "{:?}",
            warnings
        );
    }
}
