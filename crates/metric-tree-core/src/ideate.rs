//! Seeded sampling of candidate driver metrics from per-industry banks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::playbook::Stage;

pub const DEFAULT_INDUSTRY: &str = "SaaS B2B";
pub const DEFAULT_IDEA_COUNT: usize = 8;
pub const DEFAULT_DIVERSITY: u64 = 2;

const SEED_MULTIPLIER: u64 = 1337;

/// Stages sampled when the caller does not pin one.
const IDEATION_STAGES: [Stage; 5] = [
    Stage::Activation,
    Stage::Engagement,
    Stage::Retention,
    Stage::Referral,
    Stage::Revenue,
];

type Bank = [(Stage, &'static [&'static str]); 5];

const SAAS_B2B: Bank = [
    (
        Stage::Activation,
        &["Time-to-first-value", "Onboarding completion", "First team invited", "Template used"],
    ),
    (
        Stage::Engagement,
        &["Weekly core actions / WAU", "Active seats %", "Projects edited", "API calls / account"],
    ),
    (
        Stage::Retention,
        &["Logo retention", "Seat retention", "Reactivation rate", "Feature-level retention"],
    ),
    (
        Stage::Referral,
        &["Invites sent", "Invite→accept%", "Org-to-org referrals", "Public link shares"],
    ),
    (
        Stage::Revenue,
        &["Trial→paid CVR", "Expansion MRR", "ARPPU", "Gross retention"],
    ),
];

const ECOMMERCE: Bank = [
    (
        Stage::Activation,
        &["First purchase latency", "Add-to-cart completion", "Account creation CVR"],
    ),
    (
        Stage::Engagement,
        &["Session depth", "Repeat vertical visits", "Wishlist additions"],
    ),
    (
        Stage::Retention,
        &["30-day repeat purchase%", "Cohort spend decay", "Reactivation rate"],
    ),
    (
        Stage::Referral,
        &["Share to social", "Referral code usage", "UGC submissions"],
    ),
    (
        Stage::Revenue,
        &["AOV", "Items per order", "Discount take-rate", "Net margin%"],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricIdea {
    pub stage: Stage,
    pub name: String,
    pub measure: String,
    pub why: String,
}

fn bank_for(industry: &str) -> &'static Bank {
    if industry.eq_ignore_ascii_case("ecommerce") {
        &ECOMMERCE
    } else {
        &SAAS_B2B
    }
}

/// Sample metric ideas per stage.
///
/// Each stage contributes `max(1, count / stages)` distinct ideas, and the
/// result is cut to `count`. The same `diversity` always yields the same
/// ideas. Industries without a bank use the SaaS B2B ideas but keep their
/// own name in the text.
pub fn ideate(
    industry: Option<&str>,
    stage: Option<Stage>,
    count: usize,
    diversity: u64,
) -> Vec<MetricIdea> {
    let industry = industry
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY);
    let bank = bank_for(industry);
    let stages: Vec<Stage> = match stage {
        Some(s) => vec![s],
        None => IDEATION_STAGES.to_vec(),
    };

    let mut rng = StdRng::seed_from_u64(diversity.wrapping_mul(SEED_MULTIPLIER));
    let per = (count / stages.len()).max(1);

    let mut out = Vec::new();
    for s in stages {
        let pool = bank
            .iter()
            .find(|(bank_stage, _)| *bank_stage == s)
            .map(|(_, names)| *names)
            .unwrap_or_default();
        for name in pool.choose_multiple(&mut rng, per.min(pool.len())) {
            out.push(MetricIdea {
                stage: s,
                name: name.to_string(),
                measure: format!("Define a precise formula for '{}' and owner.", name),
                why: format!(
                    "{} is often a leading indicator for {} in {}.",
                    name,
                    s.as_str().to_lowercase(),
                    industry
                ),
            });
        }
    }
    out.truncate(count);

    debug!(industry, count = out.len(), diversity, "Generated metric ideas");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spread() {
        let ideas = ideate(None, None, DEFAULT_IDEA_COUNT, DEFAULT_DIVERSITY);
        // 8 / 5 stages rounds down to one idea each
        assert_eq!(ideas.len(), 5);
        assert_eq!(ideas[0].stage, Stage::Activation);
        assert_eq!(ideas[4].stage, Stage::Revenue);
        assert!(ideas[0].why.ends_with("for activation in SaaS B2B."));
    }

    #[test]
    fn test_same_diversity_same_ideas() {
        let a = ideate(Some("eCommerce"), None, 10, 3);
        let b = ideate(Some("eCommerce"), None, 10, 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_single_stage_without_replacement() {
        let ideas = ideate(Some("SaaS B2B"), Some(Stage::Revenue), 10, 1);
        assert_eq!(ideas.len(), 4);
        let mut names: Vec<&str> = ideas.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
        assert_eq!(
            ideas[0].measure,
            format!("Define a precise formula for '{}' and owner.", ideas[0].name)
        );
    }

    #[test]
    fn test_unknown_industry_uses_default_bank() {
        let ideas = ideate(Some("Fintech"), Some(Stage::Referral), 2, 2);
        assert_eq!(ideas.len(), 2);
        assert!(ideas.iter().all(|i| i.why.ends_with("in Fintech.")));
    }

    #[test]
    fn test_stage_without_bank_is_empty() {
        assert!(ideate(None, Some(Stage::Adoption), 8, 2).is_empty());
    }
}
