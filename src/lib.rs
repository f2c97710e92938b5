pub mod approval;
pub mod auth;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod seat_map;
pub mod services;
pub mod store;
pub mod uploads;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::TokenService;
use crate::cache::CacheService;
use crate::config::Config;
use crate::database::Database;
use crate::redis_client::RedisClient;
use crate::services::{AccountService, ApprovalService, CatalogService, InventoryLedger, ReviewService};
use crate::store::{MemoryStore, PgStore, Store};
use crate::uploads::{PosterStore, PUBLIC_PREFIX};

// Multipart overhead on top of the poster itself
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

// Shared state for the whole application
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub cache: CacheService,
    pub tokens: TokenService,
    pub posters: PosterStore,
    pub accounts: AccountService,
    pub approvals: ApprovalService,
    pub ledger: InventoryLedger,
    pub catalog: CatalogService,
    pub reviews: ReviewService,
}

impl AppState {
    /// Connects the configured backends: Postgres when `DATABASE_URL` is set,
    /// the in-memory store otherwise, and Redis for the catalog cache when
    /// `REDIS_URL` is set.
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn Store> = match config.database.url.as_deref() {
            Some(url) => {
                let db = Database::new(url, config.database.pool_size)
                    .await
                    .context("connecting to Postgres")?;
                db.run_migrations().await.context("running migrations")?;
                Arc::new(PgStore::new(db.pool))
            }
            None if config.is_production() => {
                anyhow::bail!("DATABASE_URL must be set in production");
            }
            None => {
                warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let cache = match config.redis.url.as_deref() {
            Some(url) => {
                let redis = RedisClient::new(url).await.context("connecting to Redis")?;
                CacheService::new(redis, config.redis.catalog_ttl_seconds)
            }
            None => {
                info!("REDIS_URL not set, catalog cache disabled");
                CacheService::disabled()
            }
        };

        Ok(Self::assemble(config, store, cache))
    }

    /// Wires services over an already chosen store and cache.
    pub fn assemble(config: Config, store: Arc<dyn Store>, cache: CacheService) -> Arc<Self> {
        let tokens = TokenService::new(&config.jwt);
        let posters = PosterStore::new(&config.uploads.dir, config.uploads.max_bytes);

        Arc::new(Self {
            accounts: AccountService::new(
                store.clone(),
                tokens.clone(),
                config.security.bcrypt_cost,
            ),
            approvals: ApprovalService::new(store.clone(), cache.clone()),
            ledger: InventoryLedger::new(store.clone()),
            catalog: CatalogService::new(store.clone(), cache.clone(), posters.clone()),
            reviews: ReviewService::new(store.clone()),
            config,
            store,
            cache,
            tokens,
            posters,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Showtime Booking API v1.0" }))
        .route("/health", get(health))
        .nest("/api", controllers::routes())
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.posters.dir()))
        .layer(DefaultBodyLimit::max(
            state.config.uploads.max_bytes + BODY_LIMIT_HEADROOM,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "cache": state.cache.is_enabled() })),
        ),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
