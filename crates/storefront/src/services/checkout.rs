//! Checkout service: the cart-to-order workflow.
//!
//! Converts a user's cart into an immutable order plus per-line snapshot
//! items, then empties the cart. The whole transition runs in a single
//! database transaction: either the order and all of its items exist and the
//! cart is empty, or nothing happened.
//!
//! The cart rows are read `FOR UPDATE`, so two concurrent checkouts from the
//! same user serialize - the second one finds the cart already empty and is
//! refused instead of duplicating the order.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use monsoon_core::{OrderNumber, UserId};

use crate::db::RepositoryError;
use crate::models::{CartEntry, Order, ShippingDetails, cart_total};

/// How many fresh order numbers to try before giving up on a collision
/// streak. One retry is already vanishingly unlikely to be needed.
const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's cart has no lines; nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// Database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service for the checkout workflow.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order.
    ///
    /// The total and the per-item unit prices are the products' effective
    /// prices *at this moment*, not values cached when the cart was built.
    /// Order numbers are random; on the rare unique-constraint collision the
    /// whole transaction is retried with a fresh number.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines (no
    /// writes are performed).
    /// Returns `CheckoutError::Repository` for database errors, including a
    /// still-colliding order number after all retries.
    pub async fn place_order(
        &self,
        user_id: UserId,
        details: &ShippingDetails,
    ) -> Result<Order, CheckoutError> {
        let mut attempt = 1;
        loop {
            let order_number = OrderNumber::generate();
            match self.try_place_order(user_id, details, &order_number).await {
                Err(CheckoutError::Repository(RepositoryError::Conflict(_)))
                    if attempt < MAX_ORDER_NUMBER_ATTEMPTS =>
                {
                    tracing::warn!(
                        order_number = %order_number,
                        attempt,
                        "order number collision, retrying with a fresh number"
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One attempt at the checkout transaction with a fixed order number.
    async fn try_place_order(
        &self,
        user_id: UserId,
        details: &ShippingDetails,
        order_number: &OrderNumber,
    ) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // Lock the cart lines for the duration of the transaction. A
        // concurrent checkout blocks here and then sees an empty cart.
        let entries = sqlx::query_as::<_, CartEntry>(
            r"
            SELECT cl.id AS line_id, cl.product_id, p.name, p.slug, cl.quantity,
                   p.price, p.discount_price, p.stock
            FROM cart_lines cl
            JOIN products p ON p.id = cl.product_id
            WHERE cl.user_id = $1
            ORDER BY cl.created_at
            FOR UPDATE OF cl
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        if entries.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total: Decimal = cart_total(&entries);

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (user_id, order_number, full_name, email, phone,
                                address, city, state, pincode, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, order_number, full_name, email, phone, address,
                      city, state, pincode, total_amount, status, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(order_number)
        .bind(&details.full_name)
        .bind(&details.email)
        .bind(&details.phone)
        .bind(&details.address)
        .bind(&details.city)
        .bind(&details.state)
        .bind(&details.pincode)
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for entry in &entries {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order.id)
            .bind(entry.product_id)
            .bind(entry.quantity)
            .bind(entry.unit_price())
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            lines = entries.len(),
            "order placed"
        );

        Ok(order)
    }
}
