use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use game_recommender::{
    config::Config,
    db::{create_redis_client, RedisProfileStore},
    routes::{create_router, AppState},
    services::{
        providers::RawgProvider, Catalog, EnrichmentGateway, FanOutCoordinator, Recommender,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Catalog and index are built before the listener opens; any failure here is fatal
    let catalog = Catalog::from_path(&config.catalog_path).context("Failed to load game catalog")?;

    let provider = RawgProvider::new(
        config.rawg_api_key.clone(),
        config.rawg_api_url.clone(),
        config.enrichment_timeout(),
    )
    .context("Failed to build RAWG client")?;

    let gateway = EnrichmentGateway::new(
        Arc::new(provider),
        config.enrichment_timeout(),
        config.enrichment_cache_capacity,
    )?;
    let coordinator = FanOutCoordinator::new(Arc::new(gateway), config.enrichment_workers)?;
    let recommender = Recommender::new(catalog, coordinator)
        .context("Failed to build text index")?
        .with_count(config.recommendation_count);

    let redis_client = create_redis_client(&config.redis_url)?;
    let profiles = Arc::new(RedisProfileStore::new(redis_client));

    let app = create_router(AppState {
        recommender,
        profiles,
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        workers = config.enrichment_workers,
        cache_capacity = config.enrichment_cache_capacity,
        "Game recommender listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
