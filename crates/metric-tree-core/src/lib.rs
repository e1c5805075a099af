//! Metric Trees Core Library
//!
//! Provides the domain types, numerical kernels, and service traits behind
//! the metric-trees server.
//!
//! # Architecture
//!
//! This crate defines:
//! - Metric tree types and operations (`Tree`, expansion, lint, propagation, forecast)
//! - North Star suggestion, stage playbooks, and metric ideation
//! - The OLS elasticity estimator
//! - Retrieval ranking and the `RetrievalBackend` / `EmbeddingProvider` seams
//! - Error types and configuration
//!
//! # Example
//!
//! ```
//! use metric_tree_core::tree::{expand_tree, lint_tree};
//!
//! let tree = expand_tree("Weekly Active Accounts (WAA)", "SaaS B2B");
//! assert_eq!(tree.north_star.id, "ns");
//! assert!(lint_tree(&tree).iter().all(|w| w.starts_with("Missing")));
//! ```

pub mod config;
pub mod elasticity;
pub mod embeddings;
pub mod error;
pub mod ideate;
pub mod nsm;
pub mod ordered_map;
pub mod playbook;
pub mod retrieval;
pub mod tree;

// Re-exports for convenience
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use ordered_map::OrderedMap;
pub use playbook::Stage;
