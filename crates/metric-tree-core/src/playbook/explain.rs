//! Explain a metric node, optionally enriched from the playbook corpus.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::stage::Stage;
use super::TeamActions;
use crate::error::{CoreError, CoreResult};
use crate::retrieval::{clean_text, MetadataFilter, RetrievalBackend, RetrievalQuery};

/// Hits requested from the corpus per explanation.
pub const RAG_QUERY_LIMIT: usize = 5;

/// Only the best hits are mined for sentences.
pub const RAG_HITS_CONSIDERED: usize = 3;

/// Upper bound on `how_to_move` after enrichment.
pub const MAX_MOVES: usize = 8;

/// A corpus sentence must mention one of these to count as a move.
pub const MOVE_KEYWORDS: [&str; 11] = [
    "increase",
    "improve",
    "reduce",
    "optimiz",
    "experiment",
    "measure",
    "cohort",
    "retention",
    "activation",
    "referral",
    "pricing",
];

const MIN_SENTENCE_CHARS: usize = 24;
const MAX_SENTENCE_CHARS: usize = 160;

static SENTENCE_BREAK: OnceLock<Regex> = OnceLock::new();

fn sentence_break() -> &'static Regex {
    SENTENCE_BREAK.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence regex must compile"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub node: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub use_rag: bool,
    #[serde(default)]
    pub industry: Option<String>,
    /// Explicit stage; inferred from the node name when absent
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub node: String,
    pub stage: Stage,
    pub why_it_matters: String,
    pub how_to_move: Vec<String>,
    pub how_to_measure: Vec<String>,
    pub counter_metric: String,
    pub owner_suggestions: Vec<String>,
    pub team_actions: TeamActions,
}

/// Build the explanation for one node.
///
/// With `use_rag` and a backend, up to three corpus sentences are appended
/// to `how_to_move` as `From playbooks: ...`. Retrieval failures are logged
/// and the base playbook is returned unchanged.
///
/// # Errors
///
/// - `Missing node` when the node name is blank
/// - unknown explicit stage
#[instrument(skip(request, retrieval), fields(node = %request.node, use_rag = request.use_rag))]
pub async fn explain(
    request: &ExplainRequest,
    retrieval: Option<&dyn RetrievalBackend>,
) -> CoreResult<Explanation> {
    let node = request.node.trim();
    if node.is_empty() {
        return Err(CoreError::validation("node", "Missing node"));
    }

    let stage = match request.stage.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse::<Stage>()?,
        _ => Stage::infer(node),
    };

    let playbook = stage.playbook(node);
    let mut why = playbook.why;
    if let Some(parent) = request.parent.as_deref().map(str::trim) {
        if !parent.is_empty() {
            why.push_str(&format!(" It influences '{}'.", parent));
        }
    }

    let mut moves = playbook.moves;
    if request.use_rag {
        match retrieval {
            Some(backend) => enrich_moves(backend, node, stage, request, &mut moves).await,
            None => debug!("RAG requested without a retrieval backend"),
        }
    }

    Ok(Explanation {
        node: node.to_string(),
        stage,
        why_it_matters: why,
        how_to_move: moves,
        how_to_measure: playbook.measures,
        counter_metric: playbook.counter,
        owner_suggestions: playbook.owners,
        team_actions: playbook.actions,
    })
}

async fn enrich_moves(
    backend: &dyn RetrievalBackend,
    node: &str,
    stage: Stage,
    request: &ExplainRequest,
    moves: &mut Vec<String>,
) {
    let query = RetrievalQuery::new(
        format!("{} {} improve experiment measure", node, stage),
        RAG_QUERY_LIMIT,
    )
    .with_filter(MetadataFilter::new(
        request.industry.clone(),
        Some(stage.as_str().to_string()),
    ));

    let results = match backend.search(&query).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, backend = backend.name(), "Playbook retrieval failed; using base playbook");
            return;
        }
    };

    let mut added = 0;
    for hit in results.hits.iter().take(RAG_HITS_CONSIDERED) {
        if let Some(sentence) = extract_playbook_move(&hit.text) {
            if moves.len() < MAX_MOVES {
                moves.push(format!("From playbooks: {}", sentence));
                added += 1;
            }
        }
    }
    debug!(provider = %results.provider, added, "Playbook enrichment done");
}

/// First sentence of `text` that reads like an actionable move.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace. A candidate must
/// be 24 to 160 characters and mention one of [`MOVE_KEYWORDS`].
pub fn extract_playbook_move(text: &str) -> Option<String> {
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }

    let mut start = 0;
    let mut sentences = Vec::new();
    for m in sentence_break().find_iter(&text) {
        // terminal punctuation is one byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .find(|s| {
            let len = s.chars().count();
            let lower = s.to_lowercase();
            (MIN_SENTENCE_CHARS..=MAX_SENTENCE_CHARS).contains(&len)
                && MOVE_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(str::to_string)
}
