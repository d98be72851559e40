use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which sentence-embedding backend scores semantic similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// all-MiniLM-L6-v2 through fastembed. Falls back to `Hash` if the model cannot load.
    FastEmbed,
    /// Deterministic feature hashing. No model download.
    Hash,
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastembed" | "minilm" => Ok(EmbeddingBackend::FastEmbed),
            "hash" | "hashing" => Ok(EmbeddingBackend::Hash),
            other => bail!("Unknown EMBEDDING_BACKEND '{other}' (expected 'fastembed' or 'hash')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub embedding_backend: EmbeddingBackend,
    pub model_cache_dir: Option<PathBuf>,
    pub taxonomy_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub semantic_weight: f64,
    pub coverage_weight: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_upload_mb: usize = parse_or(&lookup, "MAX_UPLOAD_MB", 10)?;

        let config = Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 7860)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_backend: parse_or(&lookup, "EMBEDDING_BACKEND", EmbeddingBackend::FastEmbed)?,
            model_cache_dir: lookup("MODEL_CACHE_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            taxonomy_path: lookup("SKILLS_TAXONOMY_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            chunk_size: parse_or(&lookup, "CHUNK_SIZE", 900)?,
            chunk_overlap: parse_or(&lookup, "CHUNK_OVERLAP", 100)?,
            semantic_weight: parse_or(&lookup, "SEMANTIC_WEIGHT", 0.4)?,
            coverage_weight: parse_or(&lookup, "COVERAGE_WEIGHT", 0.6)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("CHUNK_SIZE must be greater than zero");
        }
        if self.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_MB must be greater than zero");
        }
        let weights = [self.semantic_weight, self.coverage_weight];
        if !weights.iter().all(|w| w.is_finite() && *w >= 0.0) {
            bail!("SEMANTIC_WEIGHT and COVERAGE_WEIGHT must be finite, non-negative numbers");
        }
        if self.semantic_weight + self.coverage_weight <= 0.0 {
            bail!("SEMANTIC_WEIGHT and COVERAGE_WEIGHT cannot both be zero");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}
