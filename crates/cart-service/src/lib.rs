//! Cart service.
//!
//! Owns the per-user cart rows and prices them against the product
//! catalog on read. A cart row stores only `(product_id, quantity)`;
//! names and prices are resolved at snapshot time so the cart always
//! reflects current catalog data.

pub mod config;
pub mod error;
pub mod products;
pub mod routes;
pub mod store;

use std::sync::Arc;

use auth::TokenVerifier;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use products::ProductClient;
use store::CartStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: CartStore> {
    pub store: S,
    pub products: Arc<dyn ProductClient>,
    pub verifier: TokenVerifier,
}

impl<S: CartStore> AppState<S> {
    pub fn new(store: S, products: Arc<dyn ProductClient>, jwt_secret: &str) -> Self {
        Self {
            store,
            products,
            verifier: TokenVerifier::new(jwt_secret),
        }
    }
}

impl<S: CartStore> FromRef<AppState<S>> for TokenVerifier {
    fn from_ref(state: &AppState<S>) -> Self {
        state.verifier.clone()
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CartStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get_cart::<S>))
        .route("/cart", post(routes::cart::add_item::<S>))
        .route("/cart", delete(routes::cart::clear::<S>))
        .route("/cart/count", get(routes::cart::count::<S>))
        .route("/cart/{item_id}", put(routes::cart::update_item::<S>))
        .route("/cart/{item_id}", delete(routes::cart::remove_item::<S>))
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
