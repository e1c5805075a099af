//! Metric Trees Ingest - Playbook Documents into the Retrieval Corpus
//!
//! Turns raw text, local files, and web pages into embedded corpus records:
//!
//! ```text
//! +-------------+    +-------------+    +-------------+    +-------------+
//! |   Source    | -> |  Extractor  | -> |   Chunker   | -> |  Embedder   |
//! | text/file/  |    | HTML / PDF  |    | 900 / 200   |    | embed_batch |
//! |  url/seed   |    |  / UTF-8    |    |             |    |             |
//! +-------------+    +-------------+    +-------------+    +-------------+
//!                                                                 |
//!                                                                 v
//!                                                          +-------------+
//!                                                          |  Retrieval  |
//!                                                          |   backend   |
//!                                                          |   upsert    |
//!                                                          +-------------+
//! ```
//!
//! # Usage
//!
//! ```rust
//! use metric_tree_ingest::DocumentChunker;
//!
//! let chunker = DocumentChunker::new(900, 200);
//! let chunks = chunker.chunk("Activation predicts retention.   Measure it weekly.");
//! assert_eq!(chunks, vec!["Activation predicts retention. Measure it weekly."]);
//! ```

pub mod chunker;
pub mod fetch;
pub mod html;
pub mod pdf;
pub mod pipeline;
pub mod seed;

pub use chunker::DocumentChunker;
pub use fetch::{DocumentFetcher, FetchedDocument};
pub use html::html_to_text;
pub use pdf::PdfExtractor;
pub use pipeline::{IngestMetadata, IngestOutcome, IngestSource, IngestionService};
pub use seed::{SeedDocument, SEED_DOCS};

use metric_tree_core::CoreError;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Ingestion errors. Display strings are client-facing.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Parse failed: {0}")]
    Parse(String),

    #[error("No text extracted.")]
    NoText,

    #[error("Document too large: {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;
