use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use odds_engine::api::{self, EsportsSource, MatchSource};
use odds_engine::model::{EsportsMatch, Match};
use odds_engine::store::MergeStore;
use odds_processor::config::Config;
use odds_processor::orchestrator::Orchestrator;

/// The orchestrator binary has no ingestion of its own: it fans out to the
/// configured bookmaker services and merges into these stores on each read.
struct AppState {
    orchestrator: Orchestrator,
    match_store: MergeStore<Match>,
    esports_store: MergeStore<EsportsMatch>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();
    dotenvy::dotenv().ok();

    info!("starting odds processor (orchestrator mode)");

    let config = Config::from_env()?;
    info!(services = config.services.len(), "configuration loaded");

    let orchestrator = Orchestrator::new(config.services, config.aggregate_timeout);
    let state = Arc::new(AppState { orchestrator, match_store: MergeStore::new(), esports_store: MergeStore::new() });

    let app = Router::new()
        .route("/health", get(health))
        .route("/matches", get(matches_handler))
        .route("/esports/matches", get(esports_matches_handler))
        .route("/match-by-name", get(match_by_name_handler))
        .route("/parse", post(parse_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.health_port));
    info!(%addr, "odds processor ready");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

async fn matches_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fetch = || Box::pin(async { state.orchestrator.aggregate_matches(&state.match_store).await }) as futures::future::BoxFuture<'_, Vec<Match>>;
    Json(api::get_matches(&MatchSource::Remote(&fetch)).await)
}

async fn esports_matches_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fetch = || Box::pin(async { state.orchestrator.aggregate_esports_matches(&state.esports_store).await }) as futures::future::BoxFuture<'_, Vec<EsportsMatch>>;
    Json(api::get_esports_matches(&EsportsSource::Remote(&fetch)).await)
}

#[derive(Deserialize)]
struct NameQuery {
    q: String,
}

async fn match_by_name_handler(State(state): State<Arc<AppState>>, Query(query): Query<NameQuery>) -> impl IntoResponse {
    let fetch = || Box::pin(async { state.orchestrator.aggregate_matches(&state.match_store).await }) as futures::future::BoxFuture<'_, Vec<Match>>;
    Json(api::get_matches_by_name(&MatchSource::Remote(&fetch), &query.q).await)
}

#[derive(Deserialize)]
struct ParseQuery {
    name: Option<String>,
}

async fn parse_handler(State(state): State<Arc<AppState>>, Query(query): Query<ParseQuery>) -> impl IntoResponse {
    let targets: Vec<String> = match &query.name {
        Some(name) => vec![name.clone()],
        None => state.orchestrator.service_names().into_iter().map(str::to_string).collect(),
    };

    let mut results = Vec::with_capacity(targets.len());
    for name in targets {
        let outcome = state.orchestrator.parse_once(&name).await;
        results.push(serde_json::json!({ "adapter": name, "ok": outcome.is_ok(), "error": outcome.err() }));
    }

    Json(results)
}
