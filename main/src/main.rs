use std::sync::Arc;

use api_router::{api_routes, api_state::ApiState};
use axum::Router;
use common::{
    storage::registry::IndexRegistry,
    utils::{config::get_config, embedding::EmbeddingProvider, llm::GenerationProvider},
};
use ingestion_pipeline::{seed::seed_sample_course, CorpusManager};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    if seed_sample_course(&config).await? {
        info!("seeded sample course data");
    }

    let embedding_provider = EmbeddingProvider::from_config(&config).await?;
    info!(
        embedding_backend = %config.embedding_backend,
        embedding_dimension = embedding_provider.dimension(),
        "Embedding provider initialized"
    );

    let generation_provider = Arc::new(GenerationProvider::from_config(&config)?);

    let registry = Arc::new(IndexRegistry::new());
    let corpus = Arc::new(CorpusManager::new(
        &config,
        embedding_provider,
        Arc::clone(&registry),
    )?);

    // Build or load every course index before accepting traffic.
    corpus.warm_all().await?;
    info!(
        warmed = registry.len().await,
        "course indexes ready"
    );

    let api_state = ApiState::new(&config, Arc::clone(&corpus), generation_provider);

    let app = Router::new().merge(api_routes()).with_state(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
