//! Chunked semantic similarity between a resume and a job description.

use serde::Serialize;

use crate::embedding::{cosine, Embedder, EmbeddingError};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimilarityResult {
    /// Mean best-match similarity over JD chunks, in `[0, 1]`.
    pub mean: f64,
    /// Best-match similarity of each JD chunk, in JD order.
    pub per_jd_chunk: Vec<f64>,
}

/// For every JD chunk, the best cosine against any resume chunk; then the mean.
/// Negative similarities count as zero.
pub async fn section_similarity(
    embedder: &dyn Embedder,
    resume_chunks: &[String],
    jd_chunks: &[String],
) -> Result<SimilarityResult, EmbeddingError> {
    if resume_chunks.is_empty() || jd_chunks.is_empty() {
        return Ok(SimilarityResult::default());
    }

    let resume_vecs = embedder.embed(resume_chunks).await?;
    let jd_vecs = embedder.embed(jd_chunks).await?;
    check_dimension(embedder.dimension(), &resume_vecs)?;
    check_dimension(embedder.dimension(), &jd_vecs)?;

    let per_jd_chunk: Vec<f64> = jd_vecs
        .iter()
        .map(|jd| {
            resume_vecs
                .iter()
                .map(|r| f64::from(cosine(jd, r)))
                .fold(0.0_f64, f64::max)
                .clamp(0.0, 1.0)
        })
        .collect();

    let mean = per_jd_chunk.iter().sum::<f64>() / per_jd_chunk.len() as f64;
    Ok(SimilarityResult { mean, per_jd_chunk })
}

/// Fails on the first vector that is not `expected` floats long.
fn check_dimension(expected: usize, vectors: &[Vec<f32>]) -> Result<(), EmbeddingError> {
    match vectors.iter().find(|v| v.len() != expected) {
        Some(v) => Err(EmbeddingError::DimensionMismatch {
            expected,
            got: v.len(),
        }),
        None => Ok(()),
    }
}
