//! Payment service.
//!
//! Settlement lives here: a charge request is decided by the gateway,
//! recorded as exactly one terminal payment row, and on success fanned
//! out to the order and cart services. The fan-out is best-effort; a
//! committed charge is never un-reported because a neighbour was down.

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod routes;
pub mod store;

use std::sync::Arc;

use auth::TokenVerifier;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use client::{CartClient, OrderClient};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gateway::SettlementGateway;
use store::PaymentStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: PaymentStore> {
    pub store: S,
    pub gateway: Arc<dyn SettlementGateway>,
    pub orders: Arc<dyn OrderClient>,
    pub cart: Arc<dyn CartClient>,
    pub verifier: TokenVerifier,
}

impl<S: PaymentStore> AppState<S> {
    pub fn new(
        store: S,
        gateway: Arc<dyn SettlementGateway>,
        orders: Arc<dyn OrderClient>,
        cart: Arc<dyn CartClient>,
        jwt_secret: &str,
    ) -> Self {
        Self {
            store,
            gateway,
            orders,
            cart,
            verifier: TokenVerifier::new(jwt_secret),
        }
    }
}

impl<S: PaymentStore> FromRef<AppState<S>> for TokenVerifier {
    fn from_ref(state: &AppState<S>) -> Self {
        state.verifier.clone()
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: PaymentStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/payments/process", post(routes::payments::process::<S>))
        .route("/payments", get(routes::payments::list::<S>))
        .route("/payments/{payment_id}", get(routes::payments::get::<S>))
        .route(
            "/payments/order/{order_id}",
            get(routes::payments::get_by_order::<S>),
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
