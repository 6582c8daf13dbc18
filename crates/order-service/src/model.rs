use chrono::{DateTime, Utc};
use common::{CartLine, OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipping destination captured with the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// A stored order, as returned by every read endpoint.
///
/// `items` is the cart snapshot frozen verbatim at checkout. Names and
/// unit prices are whatever the catalog said at that moment; later
/// catalog edits change the next order, never this one.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    pub payment_id: Option<PaymentId>,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the store needs to insert a fresh order.
///
/// New orders always start with both statuses `pending` and no payment
/// reference; the store fills those in.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;

    #[test]
    fn shipping_address_serde_roundtrip() {
        let address = ShippingAddress {
            full_name: "Priya Sharma".to_string(),
            address: "221B MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            phone: "+91-9876543210".to_string(),
        };
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["pincode"], "560001");
        let back: ShippingAddress = serde_json::from_value(json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn order_serializes_statuses_lowercase() {
        let order = Order {
            id: 1,
            order_id: OrderId::from("ORD-20260825-DEADBEEF"),
            user_id: UserId::new(7),
            items: vec![CartLine {
                id: 3,
                product_id: ProductId::new(7),
                name: "Wireless Mouse".to_string(),
                quantity: 2,
                unit_price: Decimal::new(25000, 2),
                line_total: Decimal::new(50000, 2),
            }],
            subtotal: Decimal::new(50000, 2),
            shipping_cost: Decimal::ZERO,
            tax: Decimal::new(9000, 2),
            total: Decimal::new(59000, 2),
            shipping_address: ShippingAddress {
                full_name: "Priya Sharma".to_string(),
                address: "221B MG Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560001".to_string(),
                phone: "+91-9876543210".to_string(),
            },
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["payment_status"], "pending");
        assert_eq!(json["order_status"], "pending");
        assert_eq!(json["payment_id"], serde_json::Value::Null);
        assert_eq!(json["total"], 590.0);
        assert_eq!(json["items"][0]["unit_price"], 250.0);
    }
}
