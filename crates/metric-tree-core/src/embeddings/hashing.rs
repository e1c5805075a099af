//! Feature-hashing embedder.
//!
//! Each lowercase alphanumeric token is hashed with SHA-256. The first eight
//! digest bytes pick a bucket and the ninth picks a sign, so texts sharing
//! vocabulary land near each other. The result is unit-normalized.
//!
//! SHA-256 is stable across processes and platforms, so vectors persisted in
//! the corpus stay comparable with freshly embedded queries.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;
use crate::error::{CoreError, CoreResult};

pub const DEFAULT_DIMENSIONS: usize = 384;

/// Deterministic offline embedder.
///
/// # Example
///
/// ```rust
/// use metric_tree_core::embeddings::{EmbeddingProvider, HashingEmbedder};
///
/// let embedder = HashingEmbedder::new();
/// assert_eq!(embedder.dimensions(), 384);
/// assert!(embedder.is_ready());
/// ```
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: format!("hashing-sha256-d{}", dimensions),
        }
    }

    /// Embed synchronously. Blank text gives a zero vector.
    pub fn embed_sync(&self, content: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];
        if self.dimensions == 0 {
            return vector;
        }

        for token in tokens(content) {
            let digest = Sha256::digest(token.as_bytes());
            let mut head = [0u8; 8];
            head.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(head) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

fn tokens(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, content: &str) -> CoreResult<Vec<f32>> {
        if content.trim().is_empty() {
            return Err(CoreError::Embedding("Empty content".into()));
        }
        Ok(self.embed_sync(content))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn is_ready(&self) -> bool {
        true
    }
}
