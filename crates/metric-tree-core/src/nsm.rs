//! North Star metric suggestions from industry keywords.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Suggestions returned per request.
pub const MAX_CANDIDATES: usize = 3;

/// Emphasis score above which a monetization-weighted candidate leads.
pub const REVENUE_EMPHASIS_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NsmCandidate {
    pub name: String,
    pub rationale: String,
    pub tradeoffs: Vec<String>,
    pub window: String,
}

impl NsmCandidate {
    fn weekly(name: &str, rationale: &str, tradeoffs: [&str; 2]) -> Self {
        Self {
            name: name.to_string(),
            rationale: rationale.to_string(),
            tradeoffs: tradeoffs.iter().map(|p| p.to_string()).collect(),
            window: "7d".to_string(),
        }
    }
}

fn mentions(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Rank North Star candidates for an industry.
///
/// Industry keywords are matched case-insensitively. Several families can
/// match at once ("B2B media" yields both account and subscriber metrics).
/// `emphasis` maps stage names to a 0-10 score; only `Revenue` is read.
pub fn suggest_north_star(
    industry: &str,
    product_type: &str,
    emphasis: Option<&HashMap<String, f64>>,
) -> Vec<NsmCandidate> {
    let industry_lc = industry.to_lowercase();
    let mut out = Vec::new();

    if mentions(&industry_lc, &["saas", "b2b"]) {
        out.push(NsmCandidate::weekly(
            "Weekly Active Accounts (WAA)",
            "Captures account-level value realization; aligns with seat expansion and retention.",
            ["Lagging vs feature adoption", "May hide seat concentration"],
        ));
        out.push(NsmCandidate::weekly(
            "Time-to-First-Value < X days (cohort %)",
            "Early activation predicts retention; actionable by onboarding.",
            ["May bias towards shallow value", "Needs strong event semantics"],
        ));
    }
    if mentions(&industry_lc, &["streaming", "media", "video"]) {
        out.push(NsmCandidate::weekly(
            "Weekly Active Subscribers (WAS)",
            "Represents engaged, retained subscribers; pairs with minutes viewed / WAS.",
            ["Paid-only focus", "Ignores ad-supported MAU"],
        ));
    }
    if mentions(&industry_lc, &["marketplace", "rideshare", "delivery"]) {
        out.push(NsmCandidate::weekly(
            "Successful Matches / Week",
            "Measures liquidity and matching efficacy.",
            ["Quality vs quantity tradeoff", "Cold-start issues"],
        ));
    }
    if out.is_empty() {
        out.push(NsmCandidate::weekly(
            "Weekly Engaged Users (WEU)",
            "General-purpose engagement focus (≥1 meaningful interaction in 7d).",
            ["Definition must avoid vanity", "Needs stage mapping"],
        ));
    }

    let revenue = emphasis
        .and_then(|e| e.get("Revenue"))
        .copied()
        .unwrap_or(0.0);
    if revenue > REVENUE_EMPHASIS_THRESHOLD {
        out.insert(
            0,
            NsmCandidate::weekly(
                "Weekly ARPU-Adjusted Active Users",
                "Balances activity with monetization quality.",
                ["Risk of optimizing $$ over UX", "Needs guardrails"],
            ),
        );
    }

    out.truncate(MAX_CANDIDATES);
    debug!(industry, product_type, count = out.len(), "Suggested north stars");
    out
}
