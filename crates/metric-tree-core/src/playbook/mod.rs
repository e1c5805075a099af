//! Stage playbooks and node explanations.

mod explain;
mod stage;
mod templates;

use serde::{Deserialize, Serialize};

pub use explain::{
    explain, extract_playbook_move, ExplainRequest, Explanation, MAX_MOVES, MOVE_KEYWORDS,
    RAG_HITS_CONSIDERED, RAG_QUERY_LIMIT,
};
pub use stage::Stage;

/// What a team does this week and this quarter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamActions {
    pub this_week: Vec<String>,
    pub this_quarter: Vec<String>,
}

/// Guidance for moving one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub why: String,
    pub moves: Vec<String>,
    pub measures: Vec<String>,
    pub counter: String,
    pub owners: Vec<String>,
    pub actions: TeamActions,
}
