//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use monsoon_core::{CartLineId, ProductId, UserId};

use super::catalog::effective_price;

/// One (user, product) pair pending purchase.
///
/// The database enforces at most one line per pair; repeated adds increment
/// `quantity` instead of inserting a second row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    /// Unique line ID.
    pub id: CartLineId,
    /// Owning user.
    pub user_id: UserId,
    /// Product in the line.
    pub product_id: ProductId,
    /// Units of the product, always >= 1.
    pub quantity: i32,
    /// When the line was first created.
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with its product's current pricing.
///
/// This is what the cart page and the checkout workflow operate on: totals
/// are always computed from the product's price *now*, never from a value
/// cached when the line was created.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartEntry {
    /// ID of the underlying cart line.
    pub line_id: CartLineId,
    /// Product in the line.
    pub product_id: ProductId,
    /// Product display name.
    pub name: String,
    /// Product URL key.
    pub slug: String,
    /// Units of the product.
    pub quantity: i32,
    /// Product list price.
    pub price: Decimal,
    /// Product sale price, if any.
    pub discount_price: Option<Decimal>,
    /// Units on hand.
    pub stock: i32,
}

impl CartEntry {
    /// The unit price a shopper pays for this product right now.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        effective_price(self.price, self.discount_price)
    }

    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}

/// Grand total over a set of cart entries. An empty cart totals zero.
#[must_use]
pub fn cart_total(entries: &[CartEntry]) -> Decimal {
    entries.iter().map(CartEntry::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn entry(quantity: i32, price: &str, discount: Option<&str>) -> CartEntry {
        CartEntry {
            line_id: CartLineId::new(1),
            product_id: ProductId::new(1),
            name: "Test".to_string(),
            slug: "test".to_string(),
            quantity,
            price: dec(price),
            discount_price: discount.map(dec),
            stock: 10,
        }
    }

    #[test]
    fn test_line_total_uses_effective_price() {
        assert_eq!(entry(2, "100", None).line_total(), dec("200"));
        assert_eq!(entry(3, "100", Some("80")).line_total(), dec("240"));
        // Discount above list price is ignored
        assert_eq!(entry(2, "100", Some("150")).line_total(), dec("200"));
    }

    #[test]
    fn test_cart_total_empty_is_zero() {
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_cart_total_worked_example() {
        // (A: price 100 x 2) + (B: discount price 50 x 1) = 250
        let entries = vec![entry(2, "100", None), entry(1, "60", Some("50"))];
        assert_eq!(cart_total(&entries), dec("250"));
    }
}
