//! Mushaf Search - HTTP front end for the verse search index

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use mushaf_search_lib::{AppState, SearchConfig, SearchResults};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// === Request/Response types ===

#[derive(Deserialize)]
struct SearchQuery {
    /// Missing or empty `q` yields an empty result set
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    index_built: bool,
    index_records: usize,
    built_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CacheStatsResponse {
    entries: usize,
    capacity: usize,
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let index = state.search.index();
    Json(HealthResponse {
        status: "ok".to_string(),
        index_built: index.is_built(),
        index_records: index.len(),
        built_at: index.built_at(),
    })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResults> {
    let limit = state.config.effective_limit(params.limit);
    Json(state.search.search(&params.q, limit).await)
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let (entries, capacity) = state.search.cache().stats();
    Json(CacheStatsResponse { entries, capacity })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SearchConfig::load(config_path.as_deref())?;
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Using data directory: {:?}", state.data_dir);
    state.spawn_index_build();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/cache/stats", get(cache_stats))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
