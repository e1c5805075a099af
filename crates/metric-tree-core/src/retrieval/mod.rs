//! Retrieval over the playbook corpus.
//!
//! - [`record`]: stored records, hits, and metadata filters
//! - [`ranker`]: cosine and token-overlap ranking over an in-memory corpus
//! - [`backend`]: the [`RetrievalBackend`] trait that storage implements

pub mod backend;
pub mod ranker;
pub mod record;

pub use backend::{
    BackendHealth, RetrievalBackend, RetrievalProvider, RetrievalQuery, RetrievalResults,
};
pub use ranker::{clean_text, rank_by_cosine, rank_by_tokens, NORM_EPS};
pub use record::{CorpusRecord, MetadataFilter, ScoredHit};
