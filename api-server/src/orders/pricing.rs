//! Order pricing
//!
//! Pure arithmetic over the priced lines; no I/O. Unit prices are whatever
//! the caller snapshotted at order time.

/// One line ready for pricing
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub quantity: i64,
    /// Snapshotted unit price
    pub unit_price: f64,
    /// The product's own percentage discount
    pub discount_percent: f64,
}

/// The three totals stored on an order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of quantity * unit price over all lines
    pub total_price: f64,
    /// Total after per-product discounts, before the order-level discount
    pub initial_discounted_price: f64,
    /// initial_discounted_price * (1 - additional_discount_percent/100)
    pub final_discounted_price: f64,
}

/// Compute the order totals.
///
/// Per line: `line_total = quantity * unit_price`, then the product's own
/// `discount_percent` comes off the line. The order-level
/// `additional_discount_percent` is applied once, on the discounted sum.
pub fn compute_totals(lines: &[PricedLine], additional_discount_percent: f64) -> OrderTotals {
    let mut total_price = 0.0;
    let mut initial_discounted_price = 0.0;

    for line in lines {
        let line_total = line.quantity as f64 * line.unit_price;
        let line_discounted = line_total - (line.discount_percent / 100.0) * line_total;
        total_price += line_total;
        initial_discounted_price += line_discounted;
    }

    let final_discounted_price =
        initial_discounted_price * (1.0 - additional_discount_percent / 100.0);

    OrderTotals {
        total_price,
        initial_discounted_price,
        final_discounted_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_single_line_with_product_discount() {
        // 3 units at 100 with a 10% product discount
        let lines = vec![PricedLine {
            quantity: 3,
            unit_price: 100.0,
            discount_percent: 10.0,
        }];
        let totals = compute_totals(&lines, 0.0);
        assert!((totals.total_price - 300.0).abs() < EPSILON);
        assert!((totals.initial_discounted_price - 270.0).abs() < EPSILON);
        assert!((totals.final_discounted_price - 270.0).abs() < EPSILON);
    }

    #[test]
    fn test_order_level_discount_applies_once() {
        let lines = vec![PricedLine {
            quantity: 3,
            unit_price: 100.0,
            discount_percent: 10.0,
        }];
        let totals = compute_totals(&lines, 10.0);
        assert!((totals.final_discounted_price - 243.0).abs() < EPSILON);
    }

    #[test]
    fn test_multiple_lines_sum() {
        let lines = vec![
            PricedLine {
                quantity: 2,
                unit_price: 50.0,
                discount_percent: 0.0,
            },
            PricedLine {
                quantity: 1,
                unit_price: 200.0,
                discount_percent: 25.0,
            },
        ];
        let totals = compute_totals(&lines, 0.0);
        assert!((totals.total_price - 300.0).abs() < EPSILON);
        // 100 + 150
        assert!((totals.initial_discounted_price - 250.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_order_is_all_zero() {
        let totals = compute_totals(&[], 15.0);
        assert_eq!(totals.total_price, 0.0);
        assert_eq!(totals.initial_discounted_price, 0.0);
        assert_eq!(totals.final_discounted_price, 0.0);
    }

    #[test]
    fn test_full_discount_zeroes_final() {
        let lines = vec![PricedLine {
            quantity: 1,
            unit_price: 80.0,
            discount_percent: 0.0,
        }];
        let totals = compute_totals(&lines, 100.0);
        assert!((totals.final_discounted_price).abs() < EPSILON);
    }
}
