use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId, PaymentStatus, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

/// One settlement attempt. Terminal from birth: the row is written once
/// with its final status and never updated; a retried charge gets a new
/// row under a new payment id.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub payment_method: String,
    pub card_last_four: Option<String>,
    pub card_holder_name: Option<String>,
    pub status: PaymentStatus,
    pub transaction_id: Option<TransactionId>,
    pub created_at: DateTime<Utc>,
}

/// Everything the store needs to insert one terminal payment row.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub payment_method: String,
    pub card_last_four: Option<String>,
    pub card_holder_name: Option<String>,
    pub status: PaymentStatus,
    pub transaction_id: Option<TransactionId>,
}

/// Last four characters of a card number. This is all of the card that
/// may ever reach the store; the full number dies with the request.
pub fn card_last_four(number: &str) -> String {
    let tail = number.len().saturating_sub(4);
    number.get(tail..).unwrap_or(number).to_string()
}
