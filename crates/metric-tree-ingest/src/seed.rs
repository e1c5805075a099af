//! Starter playbook documents for an empty corpus.

use metric_tree_core::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedDocument {
    pub id: &'static str,
    pub text: &'static str,
    pub industry: Option<&'static str>,
    pub stage: Stage,
}

pub const SEED_DOCS: [SeedDocument; 4] = [
    SeedDocument {
        id: "tmpl_saas_01",
        text: "SaaS activation: FTUX completion increases retention. Measure activated_users / signups within 7 days. Improve with checklists and SSO.",
        industry: Some("SaaS B2B"),
        stage: Stage::Activation,
    },
    SeedDocument {
        id: "tmpl_streaming_01",
        text: "Streaming NSM: Weekly Active Subscribers. Inputs: 7-day retention, minutes viewed per subscriber, ARPU. Track completion rate and trial-to-paid.",
        industry: Some("Streaming"),
        stage: Stage::Retention,
    },
    SeedDocument {
        id: "tmpl_marketplace_01",
        text: "Marketplace liquidity: match rate and time-to-match drive successful matches per week. Balance quality and quantity, avoid cold-start traps.",
        industry: Some("Marketplace"),
        stage: Stage::Engagement,
    },
    SeedDocument {
        id: "tmpl_referral_01",
        text: "Referrals: simple invite flows near aha moments; measure referral_signups / WAU and monitor incentive abuse.",
        industry: None,
        stage: Stage::Referral,
    },
];
