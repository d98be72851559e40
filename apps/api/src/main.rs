mod analysis;
mod config;
mod embedding;
mod errors;
mod extraction;
mod routes;
mod skills;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::report::{AnalysisOptions, Analyzer};
use crate::config::{Config, EmbeddingBackend};
use crate::embedding::hashing::HashEmbedder;
use crate::embedding::Embedder;
use crate::routes::build_router;
use crate::skills::extractor::SkillExtractor;
use crate::skills::taxonomy::SkillTaxonomy;
use crate::state::AppState;
use crate::ui::Renderer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Skills taxonomy (built-in, optionally extended from a JSON file)
    let taxonomy = match &config.taxonomy_path {
        Some(path) => SkillTaxonomy::builtin_with_file(path)
            .with_context(|| format!("Failed to load skills taxonomy from {}", path.display()))?,
        None => SkillTaxonomy::builtin(),
    };
    info!("Skills taxonomy loaded ({} skills)", taxonomy.len());
    let extractor =
        SkillExtractor::new(Arc::new(taxonomy)).context("Failed to compile skill patterns")?;

    // Sentence embedder (all-MiniLM-L6-v2 by default, hashing as the fallback)
    let embedder = build_embedder(&config).await;
    info!("Embedder initialized (backend: {})", embedder.name());

    let analyzer = Analyzer::new(
        Arc::new(extractor),
        embedder,
        AnalysisOptions::from_config(&config),
    );
    let renderer = Renderer::new().context("Failed to compile UI templates")?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
        renderer: Arc::new(renderer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Picks the embedder from config. A sentence model that fails to load is not
/// fatal: the service falls back to hashing and says so.
async fn build_embedder(config: &Config) -> Arc<dyn Embedder> {
    match config.embedding_backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbedder::new()),
        EmbeddingBackend::FastEmbed => load_fastembed(config).await,
    }
}

#[cfg(feature = "fastembed")]
async fn load_fastembed(config: &Config) -> Arc<dyn Embedder> {
    use crate::embedding::fastembed::FastEmbedder;

    match FastEmbedder::load(config.model_cache_dir.clone()).await {
        Ok(embedder) => Arc::new(embedder),
        Err(e) => {
            warn!("Sentence model unavailable ({e}); falling back to the hashing embedder");
            Arc::new(HashEmbedder::new())
        }
    }
}

#[cfg(not(feature = "fastembed"))]
async fn load_fastembed(_config: &Config) -> Arc<dyn Embedder> {
    warn!("Built without the `fastembed` feature; using the hashing embedder");
    Arc::new(HashEmbedder::new())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
