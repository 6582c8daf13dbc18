use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// One cart row joined with the product fields that were current when
/// the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart row id, scoped to the cart service's table.
    pub id: i64,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Priced view of a user's cart, served by the cart service and
/// consumed by checkout.
///
/// Lines whose product could not be resolved are absent, so `total`
/// and `item_count` always describe exactly the lines present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub item_count: usize,
}

impl CartSnapshot {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
            item_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
