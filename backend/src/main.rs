use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod streak;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

fn app(state: AppState, cors: CorsLayer) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        // Days & logs
        .route("/api/days", get(handlers::days::list_days))
        .route("/api/log", post(handlers::days::add_log))
        .route("/api/log/:date/:log_id", delete(handlers::days::delete_log))
        .route("/api/export", get(handlers::days::export))
        // Stats & heatmap
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/heatmap", get(handlers::days::get_heatmap))
        // Streak freeze
        .route("/api/freeze", get(handlers::freeze::get_freeze))
        .route("/api/freeze/history", get(handlers::freeze::get_freeze))
        .route("/api/freeze/earn", post(handlers::freeze::earn_freeze))
        .route("/api/freeze/activate", post(handlers::freeze::activate_freeze))
        // Diary
        .route("/api/diary", post(handlers::diary::upsert_entry))
        .route("/api/diary/date/:date", get(handlers::diary::get_by_date))
        .route("/api/diary/year/:year", get(handlers::diary::list_year))
        .route("/api/diary/timeline", get(handlers::diary::timeline))
        .route("/api/diary/on-this-day", get(handlers::diary::on_this_day))
        .route("/api/diary/stats", get(handlers::diary::get_stats))
        .route(
            "/api/diary/:id",
            put(handlers::diary::update_entry).delete(handlers::diary::delete_entry),
        )
        // Resource library
        .route(
            "/api/resources",
            get(handlers::resources::list_resources).post(handlers::resources::create_resource),
        )
        .route("/api/resources/search/:query", get(handlers::resources::search_resources))
        .route("/api/resources/stats", get(handlers::resources::get_stats))
        .route(
            "/api/resources/:id",
            get(handlers::resources::get_resource)
                .put(handlers::resources::update_resource)
                .delete(handlers::resources::delete_resource),
        )
        .route("/api/resources/:id/complete", post(handlers::resources::complete_resource))
        .route("/api/resources/:id/rate", post(handlers::resources::rate_resource))
        .route("/api/resources/:id/toggle-pin", post(handlers::resources::toggle_pin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .context("FRONTEND_URL is not a valid origin")?];
    // In dev, also allow LAN access (e.g. testing from another device)
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devtracker_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    let cors = cors_layer(&config)?;
    let state = AppState {
        db,
        config: config.clone(),
    };

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state, cors)).await?;

    Ok(())
}
