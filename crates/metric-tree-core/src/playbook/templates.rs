//! Playbook text for every stage.

use super::stage::Stage;
use super::{Playbook, TeamActions};

struct StageTemplate {
    /// Appended to the node name to form the "why it matters" line
    why_tail: &'static str,
    moves: &'static [&'static str],
    measures: &'static [&'static str],
    counter: &'static str,
    owners: &'static [&'static str],
    this_week: &'static [&'static str],
    this_quarter: &'static [&'static str],
}

const ADOPTION: StageTemplate = StageTemplate {
    why_tail: "expands top-of-funnel volume so more qualified users enter your product.",
    moves: &[
        "Tighten targeting & landing page M/M fit",
        "Ship high-intent SEO pages",
        "Try partner distribution loops",
    ],
    measures: &[
        "New users/day",
        "Visit→Signup CVR",
        "CAC by channel",
        "Qualified traffic share",
    ],
    counter: "Low-quality traffic inflates vanity signups and CAC.",
    owners: &["Growth PM", "Perf Marketing", "Web Eng"],
    this_week: &["Rewrite hero & CTA", "Launch A/B test"],
    this_quarter: &["SEO hub", "Partnerships"],
};

const ACTIVATION: StageTemplate = StageTemplate {
    why_tail:
        "shortens time-to-value and increases the share of new users who reach the aha moment.",
    moves: &[
        "Guide to aha in FTUX",
        "Reduce cognitive load (defaults, samples)",
        "Shorten time-to-value (templates/importers)",
    ],
    measures: &[
        "Activation rate",
        "Time-to-aha",
        "FTUX completion%",
        "Step drop-off",
    ],
    counter: "Bloat or hard gates slow time-to-value.",
    owners: &["Product PM", "Onboarding Eng", "Design"],
    this_week: &["Define aha & log it", "Trim FTUX by 30%"],
    this_quarter: &["Template gallery", "Guided checklist"],
};

const ENGAGEMENT: StageTemplate = StageTemplate {
    why_tail: "deepens habitual use and compounds long-term value creation.",
    moves: &[
        "Instrument core-action frequency",
        "Lifecycle nudges for dormant users",
        "Personalize home to next best action",
    ],
    measures: &[
        "DAU/WAU/MAU",
        "Core action freq",
        "Stickiness (DAU/MAU)",
        "Feature adoption%",
    ],
    counter: "Notification fatigue / dark patterns hurt trust.",
    owners: &["Lifecycle Marketing", "Data Science", "Core Eng"],
    this_week: &["Set weekly core-action target", "Enable nudges"],
    this_quarter: &["Personalized home", "Habit loops"],
};

const RETENTION: StageTemplate = StageTemplate {
    why_tail: "preserves acquired value; small gains here usually beat top-of-funnel.",
    moves: &[
        "Cohort analysis by feature adoption",
        "Fix recurring friction (perf, billing)",
        "Reinforce success moments",
    ],
    measures: &[
        "D1/D7/D30 retention",
        "Monthly churn%",
        "Cohort decay slope",
        "Reactivation rate",
    ],
    counter: "Over-indexing on legacy behavior blocks innovation.",
    owners: &["Lifecycle PM", "Support Ops", "SRE/Perf"],
    this_week: &["Instrument churn reasons", "Win-back email"],
    this_quarter: &["Reliability SLIs", "Reactivation series"],
};

const REFERRAL: StageTemplate = StageTemplate {
    why_tail: "turns happy users into a growth channel with near-zero CAC.",
    moves: &[
        "Share at success moments",
        "Right-size incentives & anti-abuse",
        "Lower invite friction (deep links)",
    ],
    measures: &["Invites sent", "Invite→Accept rate", "k-factor", "Fraud rate"],
    counter: "Abuse/spam; incentive cannibalization.",
    owners: &["Growth PM", "Platform Eng", "Fraud/Risk"],
    this_week: &["Add share at success", "Prefill messages"],
    this_quarter: &["Incentive tuning", "Abuse heuristics"],
};

const REVENUE: StageTemplate = StageTemplate {
    why_tail: "monetizes captured value while balancing conversion and long-term LTV.",
    moves: &[
        "Price-to-value alignment",
        "Trial→Paid experiments",
        "Reduce involuntary churn (dunning)",
    ],
    measures: &[
        "Trial→Paid CVR",
        "ARPU/ARPPU",
        "MRR/ARR",
        "Gross/Net retention",
    ],
    counter: "Short-term discounts erode LTV and brand.",
    owners: &["Monetization PM", "RevOps", "Billing Eng"],
    this_week: &["Simplify paywall copy", "Trial prompt"],
    this_quarter: &["Plan audit", "Improve dunning"],
};

fn template(stage: Stage) -> &'static StageTemplate {
    match stage {
        Stage::Adoption => &ADOPTION,
        Stage::Activation => &ACTIVATION,
        Stage::Engagement => &ENGAGEMENT,
        Stage::Retention => &RETENTION,
        Stage::Referral => &REFERRAL,
        Stage::Revenue => &REVENUE,
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Stage {
    /// The base playbook for `node` at this stage.
    pub fn playbook(&self, node: &str) -> Playbook {
        let t = template(*self);
        Playbook {
            why: format!("{} {}", node, t.why_tail),
            moves: owned(t.moves),
            measures: owned(t.measures),
            counter: t.counter.to_string(),
            owners: owned(t.owners),
            actions: TeamActions {
                this_week: owned(t.this_week),
                this_quarter: owned(t.this_quarter),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_full_playbook() {
        for stage in Stage::ALL {
            let p = stage.playbook("X");
            assert!(p.why.starts_with("X "), "{}: {}", stage, p.why);
            assert_eq!(p.moves.len(), 3, "{}", stage);
            assert_eq!(p.measures.len(), 4, "{}", stage);
            assert_eq!(p.owners.len(), 3, "{}", stage);
            assert_eq!(p.actions.this_week.len(), 2, "{}", stage);
            assert_eq!(p.actions.this_quarter.len(), 2, "{}", stage);
            assert!(!p.counter.is_empty());
        }
    }

    #[test]
    fn test_retention_text() {
        let p = Stage::Retention.playbook("7-day retention");
        assert_eq!(
            p.why,
            "7-day retention preserves acquired value; small gains here usually beat top-of-funnel."
        );
        assert_eq!(p.counter, "Over-indexing on legacy behavior blocks innovation.");
        assert_eq!(p.owners[0], "Lifecycle PM");
    }
}
