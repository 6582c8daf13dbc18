//! Payment service entry point.

use std::sync::Arc;
use std::time::Duration;

use client::{HttpCartClient, HttpClientConfig, HttpOrderClient, build_http_client};
use common::shutdown_signal;
use payment_service::AppState;
use payment_service::config::Config;
use payment_service::gateway::SimulatedGateway;
use payment_service::store::PostgresPaymentStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Resolve configuration once
    let config = Config::from_env();

    // 4. Connect to the database and migrate
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    let store = PostgresPaymentStore::new(pool);
    store.run_migrations().await.expect("migrations failed");

    // 5. Build the collaborator clients and the gateway
    let http = build_http_client(&HttpClientConfig {
        timeout: Duration::from_secs(config.upstream_timeout_secs),
        ..HttpClientConfig::default()
    })
    .expect("failed to build http client");
    let orders = Arc::new(HttpOrderClient::new(
        http.clone(),
        config.order_service_url.clone(),
    ));
    let cart = Arc::new(HttpCartClient::new(http, config.cart_service_url.clone()));
    let gateway = Arc::new(SimulatedGateway::default());

    // 6. Build the application
    let state = Arc::new(AppState::new(
        store,
        gateway,
        orders,
        cart,
        &config.jwt_secret,
    ));
    let app = payment_service::create_app(state, metrics_handle);

    // 7. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting payment service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
