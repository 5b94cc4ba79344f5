mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::delivery::http::v1::middleware::auth_middleware;
use crate::delivery::http::v1::ratings::{delete_rating, get_rating, list_ratings, update_rating, upsert_rating};
use crate::repository::postgres::{create_pool, PostgresRatingRepository};
use crate::usecase::jwt::JwtService;
use crate::usecase::ratings::RatingsUseCase;

pub struct AppState {
    pub ratings_usecase: RatingsUseCase<PostgresRatingRepository>,
    pub jwt_service: JwtService,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let tracer_provider = if config.telemetry_enabled {
        let telemetry_config = telemetry::TelemetryConfig::from(&config);
        let provider = telemetry::init_telemetry_with_subscriber(&telemetry_config, env_filter)
            .map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;
        Some(provider)
    } else {
        telemetry::init_subscriber_without_telemetry(env_filter);
        None
    };

    tracing::info!("starting the restaurant ratings service");

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    tracing::info!(
        telemetry_enabled = config.telemetry_enabled,
        delete_policy = ?config.rating_delete_policy,
        "config loaded"
    );

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let rating_repository = PostgresRatingRepository::new(pool);
    let ratings_usecase = RatingsUseCase::new(rating_repository, config.rating_delete_policy);
    tracing::info!(delete_policy = ?ratings_usecase.delete_policy(), "ratings usecase ready");

    let shared_state = Arc::new(AppState {
        ratings_usecase,
        jwt_service: JwtService::new(config.jwt_secret.clone()),
        metrics_handle,
    });

    let router = app(shared_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(listen_addr = %config.listen_addr, "restaurant ratings service running");
    axum::serve(listener, router).await?;

    if let Some(provider) = tracer_provider {
        telemetry::shutdown_telemetry(provider);
    }

    Ok(())
}

fn app(shared_state: Arc<AppState>) -> Router {
    // All rating routes require authentication
    let ratings_api = Router::new()
        .route("/api/v1/ratings", get(list_ratings).post(upsert_rating))
        .route(
            "/api/v1/ratings/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(ratings_api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
