//! Order service.
//!
//! Checkout lives here: the caller's cart snapshot is fetched from the
//! cart service, priced, and frozen into an immutable order row. After
//! creation only the two status fields and the payment reference ever
//! change; item lines and amounts are a permanent record of what was
//! sold at which price.

pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod routes;
pub mod store;

use std::sync::Arc;

use auth::TokenVerifier;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post, put};
use client::CartClient;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use store::OrderStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub store: S,
    pub cart: Arc<dyn CartClient>,
    pub verifier: TokenVerifier,
}

impl<S: OrderStore> AppState<S> {
    pub fn new(store: S, cart: Arc<dyn CartClient>, jwt_secret: &str) -> Self {
        Self {
            store,
            cart,
            verifier: TokenVerifier::new(jwt_secret),
        }
    }
}

impl<S: OrderStore> FromRef<AppState<S>> for TokenVerifier {
    fn from_ref(state: &AppState<S>) -> Self {
        state.verifier.clone()
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{order_id}", get(routes::orders::get::<S>))
        .route(
            "/orders/{order_id}/payment",
            put(routes::orders::update_payment_status::<S>),
        )
        .route(
            "/orders/{order_id}/status",
            put(routes::orders::update_status::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
