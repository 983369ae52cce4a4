use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use odds_engine::adapters::fonbet::FonbetAdapter;
use odds_engine::adapters::pinnacle::PinnacleAdapter;
use odds_engine::api::{self, MatchSource};
use odds_engine::config::{BookmakerConfig, Config};
use odds_engine::headless::NoHeadlessResolver;
use odds_engine::model::{EsportsMatch, Match, Sport};
use odds_engine::registry::{AdapterRegistry, AdapterRegistryBuilder};
use odds_engine::scheduler::{Scheduler, SchedulerConfig};
use odds_engine::store::MergeStore;
use odds_engine::transport::mirror_resolver::MirrorResolver;
use odds_engine::transport::HttpClient;

/// TTL between mirror re-resolutions, independent of the ingestion interval:
/// a mirror host stays good for much longer than one parse cycle.
const MIRROR_TTL: Duration = Duration::from_secs(900);

/// Build the mirror resolver a `HttpClient` needs from the configured
/// `mirror_url`, if any. No real headless-browser driver is wired up yet, so
/// the headless fallback always fails and resolution falls back to HTTP
/// redirect-following, then to `base_url`.
fn mirror_resolver(cfg: &BookmakerConfig, timeout: Duration) -> Option<Arc<MirrorResolver>> {
    let mirror_url = cfg.mirror_url.clone()?;
    Some(Arc::new(MirrorResolver::new(mirror_url, cfg.base_url.clone(), MIRROR_TTL, timeout, Arc::new(NoHeadlessResolver))))
}

/// Thin HTTP surface over the pure read API: the HTTP layer itself is an
/// external collaborator, so this is just the wiring that exposes the
/// underlying handlers over a socket.
struct AppState {
    store: Arc<MergeStore<Match>>,
    esports_store: Arc<MergeStore<EsportsMatch>>,
    registry: Arc<AdapterRegistry>,
    parse_timeout: Duration,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();
    dotenvy::dotenv().ok();

    info!("starting odds engine");

    let config = Config::from_env()?;
    info!(port = config.health.port, "configuration loaded");

    let store: Arc<MergeStore<Match>> = Arc::new(MergeStore::new());
    let esports_store: Arc<MergeStore<EsportsMatch>> = Arc::new(MergeStore::new());

    let mut builder = AdapterRegistryBuilder::new();

    if let Some(fonbet_cfg) = config.parser.bookmakers.get("fonbet") {
        let mirror = mirror_resolver(fonbet_cfg, config.parser.timeout);
        let http = HttpClient::new("fonbet", mirror, fonbet_cfg.base_url.clone(), fonbet_cfg.proxy_list.clone(), config.parser.timeout, header_pairs(&config));
        builder.register("fonbet", Arc::new(FonbetAdapter::new(http, Sport::Football, store.clone(), esports_store.clone())))?;
    }

    if let Some(pinnacle_cfg) = config.parser.bookmakers.get("pinnacle") {
        // The guest API (leagues listing) sits on the configured static host;
        // the odds endpoint lives on a separate host only reachable through
        // mirror resolution, so only the second client gets a resolver.
        let leagues_http = HttpClient::new("pinnacle", None, pinnacle_cfg.base_url.clone(), pinnacle_cfg.proxy_list.clone(), config.parser.timeout, header_pairs(&config));
        let odds_mirror = mirror_resolver(pinnacle_cfg, config.parser.timeout);
        let odds_http = HttpClient::new("pinnacle-odds", odds_mirror, pinnacle_cfg.base_url.clone(), pinnacle_cfg.proxy_list.clone(), config.parser.timeout, header_pairs(&config));
        builder.register("pinnacle", Arc::new(PinnacleAdapter::new(leagues_http, odds_http, store.clone())))?;
    }

    let registry = Arc::new(builder.build(&config.parser.enabled_parsers)?);

    let cancellation = CancellationToken::new();
    let async_parsing_timeout = config.health.async_parsing_timeout.unwrap_or(Duration::from_secs(60));
    let scheduler = Scheduler::new(registry.clone(), SchedulerConfig { interval: config.parser.interval, async_parsing_timeout });

    let shutdown = cancellation.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
        shutdown.cancel();
    });

    let state = Arc::new(AppState { store, esports_store, registry, parse_timeout: async_parsing_timeout });
    let app = Router::new()
        .route("/health", get(health))
        .route("/ping", get(health))
        .route("/matches", get(matches_handler))
        .route("/esports/matches", get(esports_matches_handler))
        .route("/match-by-name", get(match_by_name_handler))
        .route("/parse", post(parse_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.health.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server_cancellation = cancellation.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).with_graceful_shutdown(async move { server_cancellation.cancelled().await }).await;
    });

    info!(%addr, "odds engine ready, running ingestion loop");
    scheduler.run(cancellation).await;

    Ok(())
}

fn header_pairs(config: &Config) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = config.parser.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    headers.push(("User-Agent".to_string(), config.parser.user_agent.clone()));
    headers
}

async fn health() -> &'static str {
    "OK"
}

async fn matches_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(api::get_matches(&MatchSource::Local(&state.store)).await)
}

async fn esports_matches_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(api::get_esports_matches(&odds_engine::api::EsportsSource::Local(&state.esports_store)).await)
}

#[derive(Deserialize)]
struct NameQuery {
    q: String,
}

async fn match_by_name_handler(State(state): State<Arc<AppState>>, Query(query): Query<NameQuery>) -> impl IntoResponse {
    Json(api::get_matches_by_name(&MatchSource::Local(&state.store), &query.q).await)
}

#[derive(Deserialize)]
struct ParseQuery {
    name: Option<String>,
}

async fn parse_handler(State(state): State<Arc<AppState>>, Query(query): Query<ParseQuery>) -> impl IntoResponse {
    let report = api::trigger_parse(&state.registry, query.name.as_deref(), state.parse_timeout).await;
    Json(report)
}
