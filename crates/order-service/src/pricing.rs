//! Checkout pricing.
//!
//! Orders above the free-shipping threshold ship free, everything else
//! pays a flat rate. Tax is charged on the item subtotal only, rounded
//! to two decimal places half-to-even.

use rust_decimal::Decimal;
use serde::Serialize;

/// Amounts computed for one checkout, frozen into the order row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Prices a cart subtotal.
pub fn quote(subtotal: Decimal) -> Quote {
    let free_shipping_threshold = Decimal::new(500, 0);
    let flat_shipping = Decimal::new(40, 0);
    let tax_rate = Decimal::new(18, 2);

    let shipping_cost = if subtotal >= free_shipping_threshold {
        Decimal::ZERO
    } else {
        flat_shipping
    };
    let tax = (subtotal * tax_rate).round_dp(2);

    Quote {
        subtotal,
        shipping_cost,
        tax,
        total: subtotal + shipping_cost + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_pays_flat_shipping() {
        let q = quote(Decimal::new(250, 0));
        assert_eq!(q.shipping_cost, Decimal::new(40, 0));
        assert_eq!(q.tax, Decimal::new(45, 0));
        assert_eq!(q.total, Decimal::new(335, 0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let q = quote(Decimal::new(500, 0));
        assert_eq!(q.shipping_cost, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::new(90, 0));
        assert_eq!(q.total, Decimal::new(590, 0));
    }

    #[test]
    fn just_below_threshold_still_pays_shipping() {
        let q = quote(Decimal::new(49999, 2));
        assert_eq!(q.shipping_cost, Decimal::new(40, 0));
        // 499.99 * 0.18 = 89.9982
        assert_eq!(q.tax, Decimal::new(9000, 2));
        assert_eq!(q.total, Decimal::new(62999, 2));
    }

    #[test]
    fn tax_rounds_half_to_even() {
        // 0.25 * 0.18 = 0.045, which rounds down to the even digit.
        let q = quote(Decimal::new(25, 2));
        assert_eq!(q.tax, Decimal::new(4, 2));
    }

    #[test]
    fn zero_subtotal_quotes_shipping_only() {
        let q = quote(Decimal::ZERO);
        assert_eq!(q.shipping_cost, Decimal::new(40, 0));
        assert_eq!(q.tax, Decimal::ZERO);
        assert_eq!(q.total, Decimal::new(40, 0));
    }
}
