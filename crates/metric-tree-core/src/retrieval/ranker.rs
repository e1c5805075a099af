//! In-memory ranking over a flat corpus.
//!
//! Both rankers are pure and deterministic: scores depend only on the query
//! and the record, and ties keep corpus order.

use std::collections::HashSet;

use super::record::{CorpusRecord, MetadataFilter, ScoredHit};

/// Added to every norm before dividing.
pub const NORM_EPS: f32 = 1e-8;

/// Collapse runs of whitespace into one space and trim.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalized(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt() + NORM_EPS;
    v.iter().map(|x| x / norm).collect()
}

/// Rank by cosine similarity to `query`.
///
/// Records are dropped when they fail `filter`, have no vector, or have a
/// vector whose width differs from the query's.
pub fn rank_by_cosine(
    query: &[f32],
    corpus: &[CorpusRecord],
    filter: &MetadataFilter,
    limit: usize,
) -> Vec<ScoredHit> {
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let q = normalized(query);

    let mut scored: Vec<(f32, &CorpusRecord)> = corpus
        .iter()
        .filter(|r| filter.matches(r))
        .filter_map(|r| match r.vector.as_deref() {
            Some(v) if v.len() == q.len() => {
                let score = normalized(v).iter().zip(&q).map(|(a, b)| a * b).sum();
                Some((score, r))
            }
            _ => None,
        })
        .collect();

    sort_and_project(&mut scored, limit)
}

/// Rank by the share of query tokens present in each record.
///
/// Tokens are whitespace-separated and lowercased, so punctuation stays
/// attached to words.
pub fn rank_by_tokens(
    query: &str,
    corpus: &[CorpusRecord],
    filter: &MetadataFilter,
    limit: usize,
) -> Vec<ScoredHit> {
    if limit == 0 {
        return Vec::new();
    }
    let query_tokens = token_set(query);
    let denom = query_tokens.len().max(1) as f32;

    let mut scored: Vec<(f32, &CorpusRecord)> = corpus
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| {
            let words = token_set(&r.text);
            let overlap = query_tokens.intersection(&words).count();
            (overlap as f32 / denom, r)
        })
        .collect();

    sort_and_project(&mut scored, limit)
}

fn token_set(text: &str) -> HashSet<String> {
    clean_text(text)
        .to_lowercase()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn sort_and_project(scored: &mut [(f32, &CorpusRecord)], limit: usize) -> Vec<ScoredHit> {
    // sort_by is stable; NaN cannot occur because norms carry an epsilon
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .iter()
        .take(limit)
        .map(|(score, r)| r.to_hit(*score))
        .collect()
}
