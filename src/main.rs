//! somoni-rates server entry point.
//!
//! Starts the Axum HTTP server with the rate, market, and scrape
//! endpoints after connecting to PostgreSQL and running migrations.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use somoni_rates::api;
use somoni_rates::app_state::AppState;
use somoni_rates::config::AggregatorConfig;
use somoni_rates::domain::CityDirectory;
use somoni_rates::persistence::postgres::RateStore;
use somoni_rates::persistence::{MarketStore, RateSink};
use somoni_rates::scrape::{FetchContext, catalog};
use somoni_rates::service::{Aggregator, MarketRateService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AggregatorConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting somoni-rates");

    // Connect to PostgreSQL and apply migrations
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database_connect_timeout_secs,
        ))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = RateStore::new(pool);

    // Reference data and scrape context
    let cities = Arc::new(CityDirectory::load_or_default(&config.cities_file));
    let ctx = FetchContext::new(&config)?;

    // Build service layer
    let aggregator = Arc::new(Aggregator::new(
        catalog(),
        ctx,
        Arc::new(store.clone()) as Arc<dyn RateSink>,
    ));
    let market = MarketRateService::new(
        Arc::new(store.clone()) as Arc<dyn MarketStore>,
        Arc::clone(&cities),
    );

    // Build application state
    let app_state = AppState {
        store,
        aggregator,
        market,
        cities,
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
