//! Qdrant vector index mirror.

mod backend;
mod client;

pub use backend::QdrantBackend;
pub use client::{PointStruct, QdrantClient, QdrantClientError, QdrantClientResult, ScoredPoint};
