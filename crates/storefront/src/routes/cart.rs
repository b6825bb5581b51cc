//! Cart route handlers.
//!
//! All cart operations require a logged-in user and redirect back to a page
//! with a flash code on completion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, header::REFERER},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use monsoon_core::{CartLineId, ProductId};

use crate::db::cart::CartRepository;
use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartEntry, cart_total};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub line_id: i32,
    pub name: String,
    pub slug: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
    pub in_stock: bool,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            line_id: entry.line_id.as_i32(),
            name: entry.name.clone(),
            slug: entry.slug.clone(),
            quantity: entry.quantity,
            unit_price: filters::format_money(entry.unit_price()),
            line_total: filters::format_money(entry.line_total()),
            in_stock: entry.stock > 0,
        }
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub quantity: i32,
}

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub success: Option<String>,
    pub logged_in: bool,
}

/// Decode a cart-page flash code into display text.
fn success_message(code: &str) -> Option<String> {
    match code {
        "updated" => Some("Cart updated!".to_string()),
        "removed" => Some("Item removed from cart!".to_string()),
        _ => None,
    }
}

/// Display the cart page.
///
/// An empty cart renders normally with a zero total.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let entries = CartRepository::new(state.pool()).entries(user.id).await?;

    Ok(CartShowTemplate {
        items: entries.iter().map(CartItemView::from).collect(),
        total: filters::format_money(cart_total(&entries)),
        success: query.success.as_deref().and_then(success_message),
        logged_in: true,
    })
}

/// Add a product to the cart, or increment its line if it's already there.
///
/// Adding is unconditional - there is no stock check. Redirects back to the
/// referring page so shoppers stay where they were browsing.
#[instrument(skip(state, user, headers))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response> {
    let product_id = ProductId::new(product_id);

    let product = CatalogRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let line = CartRepository::new(state.pool())
        .add_or_increment(user.id, product.id)
        .await?;

    tracing::debug!(
        product_id = %product.id,
        quantity = line.quantity,
        "added to cart"
    );

    let back = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/products");

    Ok(Redirect::to(back).into_response())
}

/// Update a cart line's quantity.
///
/// A non-positive quantity deletes the line - that is the designed behavior
/// for "0" in the quantity box, not an error.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(cart_id): Path<i32>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let line_id = CartLineId::new(cart_id);
    let cart = CartRepository::new(state.pool());

    if form.quantity > 0 {
        cart.set_quantity(user.id, line_id, form.quantity).await?;
        Ok(Redirect::to("/cart?success=updated").into_response())
    } else {
        cart.remove(user.id, line_id).await?;
        Ok(Redirect::to("/cart?success=removed").into_response())
    }
}

/// Remove a cart line.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(cart_id): Path<i32>,
) -> Result<Response> {
    CartRepository::new(state.pool())
        .remove(user.id, CartLineId::new(cart_id))
        .await?;

    Ok(Redirect::to("/cart?success=removed").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use monsoon_core::{CartLineId, ProductId};

    #[test]
    fn test_cart_item_view_formats_totals() {
        let entry = CartEntry {
            line_id: CartLineId::new(5),
            product_id: ProductId::new(9),
            name: "Darjeeling Tea".to_string(),
            slug: "darjeeling-tea".to_string(),
            quantity: 3,
            price: "150".parse().unwrap(),
            discount_price: Some("120".parse().unwrap()),
            stock: 0,
        };

        let view = CartItemView::from(&entry);
        assert_eq!(view.unit_price, "₹120.00");
        assert_eq!(view.line_total, "₹360.00");
        assert!(!view.in_stock);
    }

    #[test]
    fn test_success_message_codes() {
        assert!(success_message("updated").is_some());
        assert!(success_message("removed").is_some());
        assert!(success_message("bogus").is_none());
    }
}
