//! Order domain types.
//!
//! Orders and their line items are written once during checkout and never
//! mutated by the storefront afterwards; status transitions belong to staff
//! tooling.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use monsoon_core::{Email, OrderId, OrderItemId, OrderNumber, OrderStatus, ProductId, UserId};

/// An order placed at checkout.
///
/// The contact/shipping fields are snapshots captured at checkout time and
/// stay fixed even if the user later edits their profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Customer-facing order number (`ORD-XXXXXXXX`).
    pub order_number: OrderNumber,
    /// Recipient name at checkout time.
    pub full_name: String,
    /// Contact email at checkout time.
    pub email: Email,
    /// Contact phone at checkout time.
    pub phone: String,
    /// Street address at checkout time.
    pub address: String,
    /// City at checkout time.
    pub city: String,
    /// State at checkout time.
    pub state: String,
    /// Postal code at checkout time.
    pub pincode: String,
    /// Sum of line totals at checkout time.
    pub total_amount: Decimal,
    /// Current lifecycle status, mutated only by staff tooling.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One line item of an order.
///
/// `price` is the unit price at purchase time and must not track later
/// product price changes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product that was purchased.
    pub product_id: ProductId,
    /// Units purchased.
    pub quantity: i32,
    /// Unit price snapshot at purchase time.
    pub price: Decimal,
}

/// An order item joined with its product's name and slug, for display.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemDetail {
    /// Product that was purchased.
    pub product_id: ProductId,
    /// Product display name (current, for linking).
    pub name: String,
    /// Product URL key (current, for linking).
    pub slug: String,
    /// Units purchased.
    pub quantity: i32,
    /// Unit price snapshot at purchase time.
    pub price: Decimal,
}

impl OrderItemDetail {
    /// Line total: snapshot unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Validated shipping/contact input for checkout.
///
/// Produced by the checkout form after field-level validation; the checkout
/// workflow copies these values verbatim into the order row.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_detail_line_total() {
        let item = OrderItemDetail {
            product_id: ProductId::new(1),
            name: "Test".to_string(),
            slug: "test".to_string(),
            quantity: 3,
            price: "49.50".parse().unwrap(),
        };
        assert_eq!(item.line_total(), "148.50".parse::<Decimal>().unwrap());
    }
}
