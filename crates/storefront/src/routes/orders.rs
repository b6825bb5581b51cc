//! Order history route handlers.
//!
//! Orders are read-only here: the storefront renders snapshots captured at
//! checkout time and never mutates them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use monsoon_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItemDetail};
use crate::state::AppState;

/// Order summary display data for the history page.
#[derive(Clone)]
pub struct OrderSummaryView {
    pub id: i32,
    pub order_number: String,
    pub total: String,
    pub status: String,
    pub placed_on: String,
}

/// Order item display data for the detail page.
#[derive(Clone)]
pub struct OrderItemView {
    pub name: String,
    pub slug: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            order_number: order.order_number.to_string(),
            total: filters::format_money(order.total_amount),
            status: order.status.label().to_string(),
            placed_on: order.created_at.format("%d %b %Y").to_string(),
        }
    }
}

impl From<&OrderItemDetail> for OrderItemView {
    fn from(item: &OrderItemDetail) -> Self {
        Self {
            name: item.name.clone(),
            slug: item.slug.clone(),
            quantity: item.quantity,
            unit_price: filters::format_money(item.price),
            line_total: filters::format_money(item.line_total()),
        }
    }
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderSummaryView>,
    pub logged_in: bool,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderSummaryView,
    pub items: Vec<OrderItemView>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub success: Option<String>,
    pub logged_in: bool,
}

/// Decode an order-page flash code into display text.
fn success_message(code: &str, order_number: &str) -> Option<String> {
    match code {
        "placed" => Some(format!(
            "Order placed successfully! Order number: {order_number}"
        )),
        _ => None,
    }
}

/// Display the current user's order history, newest first.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(OrdersIndexTemplate {
        orders: orders.iter().map(OrderSummaryView::from).collect(),
        logged_in: true,
    })
}

/// Display one order. 404 unless it belongs to the requester.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let order_id = OrderId::new(order_id);
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get_owned(order_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    let items = repo.items(order.id).await?;

    let success = query
        .success
        .as_deref()
        .and_then(|code| success_message(code, order.order_number.as_str()));

    Ok(OrderShowTemplate {
        order: OrderSummaryView::from(&order),
        items: items.iter().map(OrderItemView::from).collect(),
        full_name: order.full_name.clone(),
        email: order.email.to_string(),
        phone: order.phone.clone(),
        address: order.address.clone(),
        city: order.city.clone(),
        state: order.state.clone(),
        pincode: order.pincode.clone(),
        success,
        logged_in: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use monsoon_core::{Email, OrderNumber, OrderStatus, UserId};

    #[test]
    fn test_order_summary_view() {
        let order = Order {
            id: OrderId::new(12),
            user_id: UserId::new(1),
            order_number: OrderNumber::parse("ORD-1A2B3C4D").unwrap(),
            full_name: "Asha Rao".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            phone: "9876543210".to_string(),
            address: "14 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            total_amount: "250".parse().unwrap(),
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        };

        let view = OrderSummaryView::from(&order);
        assert_eq!(view.order_number, "ORD-1A2B3C4D");
        assert_eq!(view.total, "₹250.00");
        assert_eq!(view.status, "Pending");
        assert_eq!(view.placed_on, "01 Aug 2026");
    }

    #[test]
    fn test_success_message_includes_order_number() {
        let msg = success_message("placed", "ORD-DEADBEEF").unwrap();
        assert!(msg.contains("ORD-DEADBEEF"));
        assert!(success_message("other", "ORD-DEADBEEF").is_none());
    }
}
