//! Cart endpoints.

use std::sync::Arc;

use auth::AuthUser;
use axum::Json;
use axum::extract::{Path, State};
use common::{CartLine, CartSnapshot, ProductId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::store::CartStore;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

// -- Handlers --

/// GET /cart — the caller's priced snapshot.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn get_cart<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<CartSnapshot>, ApiError> {
    let snapshot = build_snapshot(&state, user.user_id()).await?;
    Ok(Json(snapshot))
}

/// POST /cart — add a product, accumulating quantity on repeats.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), product_id = req.product_id))]
pub async fn add_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product_id = ProductId::new(req.product_id);

    if state.products.get(product_id).await.is_none() {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    state
        .store
        .add_item(user.user_id(), product_id, req.quantity)
        .await?;
    metrics::counter!("cart_items_added").increment(1);

    Ok(Json(MessageResponse {
        message: "Item added to cart",
    }))
}

/// PUT /cart/{item_id} — set a row's quantity; zero or less removes it.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), item_id))]
pub async fn update_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.quantity <= 0 {
        state.store.remove_item(user.user_id(), item_id).await?;
        return Ok(Json(MessageResponse {
            message: "Item removed from cart",
        }));
    }

    state
        .store
        .set_quantity(user.user_id(), item_id, req.quantity)
        .await?;

    Ok(Json(MessageResponse {
        message: "Cart updated",
    }))
}

/// DELETE /cart/{item_id} — remove one row.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), item_id))]
pub async fn remove_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(item_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.remove_item(user.user_id(), item_id).await?;
    Ok(Json(MessageResponse {
        message: "Item removed from cart",
    }))
}

/// DELETE /cart — empty the caller's cart.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn clear<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.clear(user.user_id()).await?;
    Ok(Json(MessageResponse {
        message: "Cart cleared",
    }))
}

/// GET /cart/count — total quantity across the caller's rows.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn count<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.store.item_quantity(user.user_id()).await?;
    Ok(Json(CountResponse { count }))
}

/// Prices the user's rows against the catalog. Rows whose product
/// cannot be resolved are skipped rather than failing the snapshot, so
/// the totals always describe exactly the lines returned.
async fn build_snapshot<S: CartStore>(
    state: &AppState<S>,
    user_id: UserId,
) -> Result<CartSnapshot, ApiError> {
    let rows = state.store.items(user_id).await?;

    let mut items = Vec::with_capacity(rows.len());
    let mut total = Decimal::ZERO;

    for row in rows {
        let Some(product) = state.products.get(row.product_id).await else {
            tracing::warn!(product_id = %row.product_id, "skipping unresolvable cart line");
            continue;
        };

        let line_total = product.price * Decimal::from(row.quantity);
        total += line_total;
        items.push(CartLine {
            id: row.id,
            product_id: row.product_id,
            name: product.name,
            quantity: row.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    let item_count = items.len();
    Ok(CartSnapshot {
        items,
        total,
        item_count,
    })
}
