//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use monsoon_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Unique URL key.
    pub slug: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
///
/// Shoppers only ever see products with `available = true`; the flag is
/// enforced by the repository queries, not here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Unique URL key.
    pub slug: String,
    /// Long-form description, searched alongside the name.
    pub description: String,
    /// List price.
    pub price: Decimal,
    /// Optional sale price; only honored when lower than the list price.
    pub discount_price: Option<Decimal>,
    /// Units on hand. Informational only - adding to cart is unconditional.
    pub stock: i32,
    /// Whether the product is visible to shoppers.
    pub available: bool,
    /// Whether the product appears on the homepage.
    pub featured: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a shopper actually pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.price, self.discount_price)
    }

    /// Whether any units are on hand.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Effective sale price: the discount price when present and lower than the
/// list price, else the list price.
#[must_use]
pub fn effective_price(price: Decimal, discount_price: Option<Decimal>) -> Decimal {
    match discount_price {
        Some(discount) if discount < price => discount,
        _ => price,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_effective_price_no_discount() {
        assert_eq!(effective_price(dec("100"), None), dec("100"));
    }

    #[test]
    fn test_effective_price_lower_discount() {
        assert_eq!(effective_price(dec("100"), Some(dec("75.50"))), dec("75.50"));
    }

    #[test]
    fn test_effective_price_ignores_higher_discount() {
        // A "discount" above the list price is not a discount
        assert_eq!(effective_price(dec("100"), Some(dec("120"))), dec("100"));
    }

    #[test]
    fn test_effective_price_ignores_equal_discount() {
        assert_eq!(effective_price(dec("100"), Some(dec("100"))), dec("100"));
    }
}
