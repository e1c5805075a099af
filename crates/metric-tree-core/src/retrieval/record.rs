//! Corpus records, scored hits, and metadata filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::playbook::Stage;

/// One stored chunk of a playbook document.
///
/// `vector` is parsed leniently: anything other than an array of numbers
/// (including `null`) becomes `None`, and such records only take part in
/// token-overlap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "lenient_vector",
        skip_serializing_if = "Option::is_none"
    )]
    pub vector: Option<Vec<f32>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingested_at: Option<DateTime<Utc>>,
}

impl CorpusRecord {
    /// Record with text only; metadata is filled in with the builder methods.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            vector: None,
            source: None,
            url: None,
            filename: None,
            industry: None,
            stage: None,
            tags: Vec::new(),
            ingested_at: None,
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Project to a hit with the given score.
    pub fn to_hit(&self, score: f32) -> ScoredHit {
        ScoredHit {
            id: self.id.clone(),
            score,
            text: self.text.clone(),
            source: self.source.clone(),
            url: self.url.clone(),
            filename: self.filename.clone(),
            industry: self.industry.clone(),
            stage: self.stage.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// A ranked search result. Every metadata key is always present in JSON,
/// `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub filename: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Exact-match metadata predicates. A record missing a filtered field is
/// excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

impl MetadataFilter {
    /// Blank strings are treated as "no filter". Recognized stage labels
    /// are matched in their canonical spelling, the same one ingestion
    /// stores.
    pub fn new(industry: Option<String>, stage: Option<String>) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            industry: keep(industry),
            stage: keep(stage).map(|s| Stage::canonical_label(&s)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.industry.is_none() && self.stage.is_none()
    }

    pub fn matches(&self, record: &CorpusRecord) -> bool {
        field_matches(self.industry.as_deref(), record.industry.as_deref())
            && field_matches(self.stage.as_deref(), record.stage.as_deref())
    }
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual == Some(w),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_vector<'de, D>(deserializer: D) -> Result<Option<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };
    let parsed: Option<Vec<f32>> = items
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect();
    Ok(parsed.filter(|v| !v.is_empty()))
}
