//! Lifecycle stages a metric can belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Funnel stage of a metric.
///
/// `Acquisition` is accepted as an alias of `Adoption` when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(alias = "Acquisition")]
    Adoption,
    Activation,
    Engagement,
    Retention,
    Referral,
    Revenue,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Adoption,
        Stage::Activation,
        Stage::Engagement,
        Stage::Retention,
        Stage::Referral,
        Stage::Revenue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Adoption => "Adoption",
            Stage::Activation => "Activation",
            Stage::Engagement => "Engagement",
            Stage::Retention => "Retention",
            Stage::Referral => "Referral",
            Stage::Revenue => "Revenue",
        }
    }

    /// Canonical spelling of a recognized stage label; anything else is
    /// returned trimmed but otherwise untouched.
    pub fn canonical_label(label: &str) -> String {
        match label.parse::<Stage>() {
            Ok(stage) => stage.as_str().to_string(),
            Err(_) => label.trim().to_string(),
        }
    }

    /// Guess the stage from a metric name.
    ///
    /// Rules are checked in order and the first hit wins, so "Referral
    /// revenue" is `Referral`. Anything unmatched is `Engagement`.
    pub fn infer(name: &str) -> Stage {
        let n = name.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| n.contains(k));

        if has(&["adopt", "install", "signup"]) {
            Stage::Adoption
        } else if has(&["activate", "ftux", "aha"]) {
            Stage::Activation
        } else if has(&["retain", "churn"]) {
            Stage::Retention
        } else if has(&["refer", "invite", "k-factor"]) {
            Stage::Referral
        } else if has(&["revenue", "arpu", "paid", "mrr", "arr", "conversion"]) {
            Stage::Revenue
        } else {
            Stage::Engagement
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adoption" | "acquisition" => Ok(Stage::Adoption),
            "activation" => Ok(Stage::Activation),
            "engagement" => Ok(Stage::Engagement),
            "retention" => Ok(Stage::Retention),
            "referral" => Ok(Stage::Referral),
            "revenue" => Ok(Stage::Revenue),
            _ => Err(CoreError::validation(
                "stage",
                format!(
                    "Unknown stage '{}'. Expected one of: Adoption, Activation, Engagement, Retention, Referral, Revenue",
                    s
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_label() {
        assert_eq!(Stage::canonical_label("activation"), "Activation");
        assert_eq!(Stage::canonical_label(" ACQUISITION "), "Adoption");
        assert_eq!(Stage::canonical_label("Growth loops"), "Growth loops");
    }

    #[test]
    fn test_infer_keyword_precedence() {
        assert_eq!(Stage::infer("App installs"), Stage::Adoption);
        assert_eq!(Stage::infer("Users who reached aha"), Stage::Activation);
        assert_eq!(Stage::infer("Logo churn"), Stage::Retention);
        assert_eq!(Stage::infer("Invite acceptance"), Stage::Referral);
        assert_eq!(Stage::infer("Net MRR"), Stage::Revenue);
        assert_eq!(Stage::infer("Sessions / WAU"), Stage::Engagement);
        // Earlier rules win
        assert_eq!(Stage::infer("Signup conversion"), Stage::Adoption);
        assert_eq!(Stage::infer("Referral revenue"), Stage::Referral);
    }

    #[test]
    fn test_infer_is_substring_based() {
        // "7-day retention" contains "retention" but not "retain"
        assert_eq!(Stage::infer("7-day retention"), Stage::Engagement);
        assert_eq!(Stage::infer("Retained users"), Stage::Retention);
        // "Activation rate" contains neither "activate" nor "ftux"
        assert_eq!(Stage::infer("Activation rate"), Stage::Engagement);
    }

    #[test]
    fn test_parse_case_insensitive_with_alias() {
        assert_eq!("revenue".parse::<Stage>().unwrap(), Stage::Revenue);
        assert_eq!(" RETENTION ".parse::<Stage>().unwrap(), Stage::Retention);
        assert_eq!("Acquisition".parse::<Stage>().unwrap(), Stage::Adoption);
        assert!("Monetization".parse::<Stage>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_value(Stage::Adoption).unwrap(),
            serde_json::json!("Adoption")
        );
        let s: Stage = serde_json::from_str("\"Acquisition\"").unwrap();
        assert_eq!(s, Stage::Adoption);
    }
}
