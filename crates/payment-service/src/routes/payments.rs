//! Payment endpoints.

use std::sync::Arc;

use auth::AuthUser;
use axum::Json;
use axum::extract::{Path, State};
use common::{OrderId, PaymentId, PaymentStatus, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::gateway::SettlementOutcome;
use crate::model::{NewPayment, Payment, card_last_four};
use crate::store::PaymentStore;

// -- Request types --

/// Charge request. CVV, expiry and wallet handles may arrive on the
/// wire but are not bound here: they die with the request body and can
/// never reach a log line or the store.
#[derive(Deserialize)]
pub struct ProcessPaymentRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub card_number: Option<String>,
    pub card_holder_name: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProcessPaymentResponse {
    pub success: bool,
    pub message: &'static str,
    pub payment_id: PaymentId,
    pub transaction_id: TransactionId,
    pub order_id: OrderId,
    pub amount: Decimal,
}

// -- Handlers --

/// POST /payments/process — settle a charge.
///
/// Exactly one terminal row is written whatever the gateway says. Only
/// after a successful settlement do the order confirmation push and the
/// cart clear go out, in parallel; either may fail without touching the
/// already-committed payment or the response.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), order_id = %req.order_id))]
pub async fn process<S: PaymentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<Json<ProcessPaymentResponse>, ApiError> {
    let settle_start = std::time::Instant::now();
    let order_id = OrderId::from(req.order_id);
    let payment_id = PaymentId::generate();
    // Generated speculatively; stored and returned only on approval.
    let transaction_id = TransactionId::generate();

    let outcome = state.gateway.settle(&order_id, req.amount).await;
    let approved = outcome == SettlementOutcome::Approved;

    let payment = state
        .store
        .insert(NewPayment {
            payment_id,
            order_id,
            user_id: user.user_id(),
            amount: req.amount,
            payment_method: req.payment_method,
            card_last_four: req.card_number.as_deref().map(card_last_four),
            card_holder_name: req.card_holder_name,
            status: if approved {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Failed
            },
            transaction_id: approved.then(|| transaction_id.clone()),
        })
        .await?;

    metrics::histogram!("payment_settlement_duration_seconds")
        .record(settle_start.elapsed().as_secs_f64());

    if !approved {
        metrics::counter!("payments_declined").increment(1);
        return Err(ApiError::SettlementDeclined);
    }

    metrics::counter!("payments_completed").increment(1);
    tracing::info!(
        payment_id = %payment.payment_id,
        transaction_id = %transaction_id,
        amount = %payment.amount,
        "payment settled"
    );

    // Best-effort tail. The charge is already committed, so neither
    // push may fail the settlement; outcomes are logged and dropped.
    let (push, clear) = tokio::join!(
        state.orders.update_payment_status(
            &payment.order_id,
            &payment.payment_id,
            PaymentStatus::Completed,
        ),
        state.cart.clear_cart(user.bearer()),
    );
    if let Err(err) = push {
        metrics::counter!("settlement_push_failures").increment(1);
        tracing::warn!(
            error = %err,
            order_id = %payment.order_id,
            "order confirmation push failed after settlement"
        );
    }
    if let Err(err) = clear {
        metrics::counter!("settlement_push_failures").increment(1);
        tracing::warn!(error = %err, "cart clear failed after settlement");
    }

    Ok(Json(ProcessPaymentResponse {
        success: true,
        message: "Payment successful!",
        payment_id: payment.payment_id,
        transaction_id,
        order_id: payment.order_id,
        amount: payment.amount,
    }))
}

/// GET /payments — the caller's payments, newest first.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn list<S: PaymentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = state.store.list(user.user_id()).await?;
    Ok(Json(payments))
}

/// GET /payments/{payment_id} — one payment, visible to its owner only.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), payment_id = %payment_id))]
pub async fn get<S: PaymentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .store
        .get(user.user_id(), &PaymentId::from(payment_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// GET /payments/order/{order_id} — the newest settlement attempt the
/// caller made against one order.
#[tracing::instrument(skip_all, fields(user_id = %user.user_id(), order_id = %order_id))]
pub async fn get_by_order<S: PaymentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .store
        .get_by_order(user.user_id(), &OrderId::from(order_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}
