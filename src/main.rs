//! LabClear Server - laboratory equipment clearance
//!
//! REST API server for equipment borrowing, staged approvals and clearance.

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labclear_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{redis::RedisService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("labclear_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting LabClear Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let redis_service = RedisService::new(&config.redis.url, &config.redis.channel)
        .await
        .context("Failed to connect to Redis")?;

    tracing::info!(channel = %config.redis.channel, "Connected to Redis");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), redis_service);

    services
        .profiles
        .ensure_bootstrap_admin()
        .await
        .context("Failed to create bootstrap administrator")?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Profiles
        .route("/profiles", get(api::profiles::list_profiles))
        .route("/profiles", post(api::profiles::create_profile))
        .route("/profiles/:id", get(api::profiles::get_profile))
        .route("/profiles/:id", put(api::profiles::update_profile))
        .route("/profiles/:id/fines", get(api::profiles::list_profile_fines))
        // Labs
        .route("/labs", get(api::labs::list_labs))
        .route("/labs", post(api::labs::create_lab))
        .route("/labs/:id", get(api::labs::get_lab))
        .route("/labs/:id", put(api::labs::update_lab))
        .route("/labs/:id", delete(api::labs::delete_lab))
        // Inventory
        .route("/inventory", get(api::inventory::list_inventory))
        .route("/inventory", post(api::inventory::create_inventory_item))
        .route("/inventory/:id", get(api::inventory::get_inventory_item))
        .route("/inventory/:id", put(api::inventory::update_inventory_item))
        .route("/inventory/:id", delete(api::inventory::delete_inventory_item))
        // Borrow requests
        .route("/borrow-requests", get(api::borrow_requests::list_borrow_requests))
        .route("/borrow-requests", post(api::borrow_requests::submit_borrow_request))
        .route("/borrow-requests/actionable", get(api::borrow_requests::list_actionable))
        .route("/borrow-requests/:id", get(api::borrow_requests::get_borrow_request))
        .route("/borrow-requests/:id/approve", post(api::borrow_requests::approve_borrow_request))
        .route("/borrow-requests/:id/reject", post(api::borrow_requests::reject_borrow_request))
        .route("/borrow-requests/:id/handover", post(api::borrow_requests::hand_over_borrow_request))
        .route("/borrow-requests/:id/return", post(api::borrow_requests::return_borrow_request))
        // Maintenance
        .route("/maintenance", get(api::maintenance::list_maintenance))
        .route("/maintenance", post(api::maintenance::open_maintenance))
        .route("/maintenance/:id/resolve", post(api::maintenance::resolve_maintenance))
        // Procurement
        .route("/procurement", get(api::procurement::list_procurement))
        .route("/procurement", post(api::procurement::create_procurement))
        .route("/procurement/:id/status", put(api::procurement::update_procurement_status))
        // Fines and clearance
        .route("/fines", post(api::clearance::issue_fine))
        .route("/fines/:id/pay", post(api::clearance::pay_fine))
        .route("/clearance/:student_id", get(api::clearance::get_eligibility))
        .route("/clearance/:student_id/certificate", post(api::clearance::issue_certificate))
        .route("/certificates/:code", get(api::clearance::verify_certificate))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
