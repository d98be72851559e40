//! Sentence embeddings: pluggable, trait-based backends for semantic similarity.
//!
//! Default: `FastEmbedder` (all-MiniLM-L6-v2 via fastembed, 384 dimensions).
//! Fallback: `HashEmbedder` (deterministic feature hashing, no model download).
//!
//! The `Analyzer` in `AppState` holds an `Arc<dyn Embedder>` chosen at startup from config.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "fastembed")]
pub mod fastembed;
pub mod hashing;

/// Output width of all-MiniLM-L6-v2; the hashing backend matches it.
pub const EMBEDDING_DIM: usize = 384;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model error: {0}")]
    Model(String),

    #[error("expected {expected} embeddings, model returned {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("expected {expected}-dimensional embeddings, model returned {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The embedder trait. Implement this to swap backends without touching the
/// similarity code or the handlers.
///
/// Implementations return one L2-normalised vector of `dimension()` floats per
/// input text, in order.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Scales `v` to unit length in place. Zero vectors are left as they are.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity. Returns 0.0 when either vector is zero or the lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
