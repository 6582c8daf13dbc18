//! Order endpoints.

use std::sync::Arc;

use auth::AuthUser;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{OrderId, OrderStatus, PaymentStatusUpdate};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::model::{NewOrder, Order, ShippingAddress};
use crate::pricing;
use crate::store::OrderStore;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// -- Handlers --

/// POST /orders — checkout. Freezes the caller's current cart into a
/// priced order; nothing is written when the cart fetch fails or the
/// cart is empty.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    // The caller's own credential is forwarded so the cart service
    // prices that user's cart, not some service identity's.
    let snapshot = state
        .cart
        .fetch_cart(user.bearer())
        .await
        .map_err(ApiError::CartUnavailable)?;

    if snapshot.is_empty() {
        return Err(ApiError::InvalidRequest("Cart is empty".to_string()));
    }

    let quote = pricing::quote(snapshot.total);
    let order = state
        .store
        .insert(NewOrder {
            order_id: OrderId::generate(),
            user_id: user.user_id(),
            items: snapshot.items,
            subtotal: quote.subtotal,
            shipping_cost: quote.shipping_cost,
            tax: quote.tax,
            total: quote.total,
            shipping_address: req.shipping_address,
        })
        .await?;

    metrics::counter!("orders_created").increment(1);
    tracing::info!(order_id = %order.order_id, total = %order.total, "order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — the caller's orders, newest first.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.store.list(user.user_id()).await?;
    Ok(Json(orders))
}

/// GET /orders/{order_id} — one order, visible to its owner only.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), order_id = %order_id))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .get(user.user_id(), &OrderId::from(order_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// PUT /orders/{order_id}/payment — settlement outcome pushed by the
/// payment service. No bearer check here; the endpoint trusts the
/// deployment boundary.
#[tracing::instrument(skip_all, fields(order_id = %order_id))]
pub async fn update_payment_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
    Json(req): Json<PaymentStatusUpdate>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = OrderId::from(order_id);
    let updated = state
        .store
        .set_payment_status(&order_id, &req.payment_id, req.status)
        .await?;

    if !updated {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    tracing::info!(payment_id = %req.payment_id, status = %req.status, "payment status recorded");

    Ok(Json(MessageResponse {
        message: "Payment status updated",
    }))
}

/// PUT /orders/{order_id}/status — the owner overwrites the fulfilment
/// status. Any status in the enumeration is accepted, whatever the
/// current one.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), order_id = %order_id))]
pub async fn update_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(order_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| ApiError::InvalidRequest("Invalid status".to_string()))?;

    let updated = state
        .store
        .set_order_status(user.user_id(), &OrderId::from(order_id), status)
        .await?;

    if !updated {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Order status updated",
    }))
}
