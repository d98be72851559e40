//! Feature-hashing embedder. Deterministic, dependency-free, and good enough to
//! rank lexical overlap when the sentence model is unavailable.

use async_trait::async_trait;

use super::{l2_normalize, Embedder, EmbeddingError, EMBEDDING_DIM};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bigrams count for less than single words.
const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Default, Clone, Copy)]
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embeds one text: lowercase word unigrams and bigrams hashed into signed buckets.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; EMBEDDING_DIM];
        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#')))
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        for word in &words {
            self.add_feature(&mut v, word.as_bytes(), 1.0);
        }
        for pair in words.windows(2) {
            let feature = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut v, feature.as_bytes(), BIGRAM_WEIGHT);
        }

        l2_normalize(&mut v);
        v
    }

    fn add_feature(&self, v: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = (hash % v.len() as u64) as usize;
        // Top bit picks the sign.
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        v[bucket] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine;

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(fnv1a(b""), FNV_OFFSET);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed_one("Senior Rust engineer, Kubernetes and Kafka");
        let b = embedder.embed_one("Senior Rust engineer, Kubernetes and Kafka");
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIM);
    }

    #[test]
    fn test_unit_length_for_nonempty_text() {
        let v = HashEmbedder::new().embed_one("python sql airflow");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = HashEmbedder::new().embed_one("   ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_case_insensitive() {
        let embedder = HashEmbedder::new();
        assert_eq!(embedder.embed_one("PYTHON Docker"), embedder.embed_one("python docker"));
    }

    #[test]
    fn test_related_text_scores_higher_than_unrelated() {
        let embedder = HashEmbedder::new();
        let jd = embedder.embed_one("data engineer python sql airflow spark pipelines");
        let close = embedder.embed_one("built python sql pipelines on airflow and spark");
        let far = embedder.embed_one("pastry chef with croissant and sourdough experience");
        assert!(cosine(&jd, &close) > cosine(&jd, &far));
    }

    #[tokio::test]
    async fn test_trait_embed_preserves_order_and_count() {
        let embedder = HashEmbedder::new();
        let texts = vec!["alpha".to_string(), "beta".to_string(), "alpha".to_string()];
        let out = embedder.embed(&texts).await.unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], out[2]);
        assert!(out.iter().all(|v| v.len() == embedder.dimension()));
        assert_eq!(embedder.name(), "hash");
    }
}
