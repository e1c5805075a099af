//! Tool names as constants for dispatch matching.

// ========== STATUS ==========

pub const HEALTH: &str = "health";

// ========== TREE TOOLS ==========

pub const SUGGEST_NORTH_STAR: &str = "suggest_north_star";
pub const EXPAND_TREE: &str = "expand_tree";
pub const LINT_TREE: &str = "lint_tree";
pub const EXPLAIN: &str = "explain";
pub const PROPAGATE_DELTAS: &str = "propagate_deltas";
pub const FORECAST_SERIES: &str = "forecast_series";

// ========== RAG TOOLS ==========

pub const RAG_SEARCH: &str = "rag_search";
pub const RAG_INGEST_TEXT: &str = "rag_ingest_text";
pub const RAG_INGEST_FILE: &str = "rag_ingest_file";
pub const RAG_INGEST_URL: &str = "rag_ingest_url";
pub const RAG_INGEST_SEED: &str = "rag_ingest_seed";

// ========== ANALYSIS TOOLS ==========

pub const ELASTICITIES_ESTIMATE: &str = "elasticities_estimate";
pub const IDEATE_METRICS: &str = "ideate_metrics";
