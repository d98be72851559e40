//! all-MiniLM-L6-v2 through fastembed (ONNX runtime). The model is fetched into
//! the cache dir on first start.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use super::{l2_normalize, Embedder, EmbeddingError, EMBEDDING_DIM};

const BATCH_SIZE: usize = 32;

pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Loads the model on a blocking thread; downloading it can take a while.
    pub async fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let model = tokio::task::spawn_blocking(move || {
            let mut options =
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }
            TextEmbedding::try_new(options).map_err(|e| EmbeddingError::Model(e.to_string()))
        })
        .await??;

        info!("Loaded sentence embedding model all-MiniLM-L6-v2");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    fn name(&self) -> &str {
        "all-MiniLM-L6-v2"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let expected = texts.len();
        let documents = texts.to_vec();
        let model = Arc::clone(&self.model);

        let mut vectors = tokio::task::spawn_blocking(move || {
            let model = model
                .lock()
                .map_err(|_| EmbeddingError::Model("embedding model lock poisoned".to_string()))?;
            model
                .embed(documents, Some(BATCH_SIZE))
                .map_err(|e| EmbeddingError::Model(e.to_string()))
        })
        .await??;

        if vectors.len() != expected {
            return Err(EmbeddingError::CountMismatch {
                expected,
                got: vectors.len(),
            });
        }
        vectors.iter_mut().for_each(|v| l2_normalize(v));
        debug!(count = expected, "embedded chunks");
        Ok(vectors)
    }
}
