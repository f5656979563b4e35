use axum::Json;
use axum::{Router, extract::Extension, routing::get};
use serde::Serialize;
use std::sync::Arc;
use wine_recommender::catalog::handlers::{
    handle_get_wine, handle_list_wines, handle_search_wines, handle_wine_stats,
};
use wine_recommender::catalog::store::WineCatalog;
use wine_recommender::config::ServerConfig;
use wine_recommender::model::engine::RecommendationEngine;
use wine_recommender::model::handlers::{handle_model_status, handle_recommendations};
use wine_recommender::model::startup::load_with_retry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting wine recommendation service on {}", config.bind_addr);

    // 1. Catalog:
    let catalog = match &config.catalog_path {
        Some(path) => match WineCatalog::load_json(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Failed to load catalog: {:#}; using sample data", e);
                WineCatalog::with_sample_data()
            }
        },
        None => {
            tracing::info!("No catalog file configured; using sample data");
            WineCatalog::with_sample_data()
        }
    };
    let catalog = Arc::new(catalog);

    // 2. Recommendation engine (degraded mode if the model never shows up):
    let engine = Arc::new(RecommendationEngine::from_paths(
        config.model_path.clone(),
        config.vectorizer_path.clone(),
    ));
    if !load_with_retry(engine.clone(), config.retry).await {
        tracing::warn!("Recommendations disabled: {:?}", engine.status());
    }

    // 3. HTTP Router:
    let app = Router::new()
        .route("/", get(handle_health))
        .route("/health", get(handle_health))
        .route("/model/status", get(handle_model_status))
        .route("/wines", get(handle_list_wines))
        .route("/wines/search", get(handle_search_wines))
        .route("/wines/stats", get(handle_wine_stats))
        .route("/wines/:id", get(handle_get_wine))
        .route("/wines/:id/recommendations", get(handle_recommendations))
        .layer(Extension(catalog))
        .layer(Extension(engine));

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "wine recommendation service is running",
    })
}
