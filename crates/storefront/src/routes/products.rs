//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::catalog::{CatalogFilter, CatalogRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Category, Product};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub slug: String,
    pub name: String,
    /// Effective price, pre-formatted.
    pub price: String,
    /// List price, pre-formatted, present only when a real discount applies.
    pub list_price: Option<String>,
    pub in_stock: bool,
}

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub slug: String,
    pub name: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let effective = product.effective_price();
        let list_price = (effective < product.price).then(|| filters::format_money(product.price));

        Self {
            slug: product.slug.clone(),
            name: product.name.clone(),
            price: filters::format_money(effective),
            list_price,
            in_stock: product.in_stock(),
        }
    }
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            slug: category.slug.clone(),
            name: category.name.clone(),
        }
    }
}

/// Query parameters for the product listing page.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub error: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCard>,
    pub categories: Vec<CategoryView>,
    pub selected_category: Option<String>,
    pub search_query: Option<String>,
    pub logged_in: bool,
    pub warning: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub list_price: Option<String>,
    pub in_stock: bool,
    pub product_id: i32,
    pub related_products: Vec<ProductCard>,
    pub logged_in: bool,
}

/// Decode a listing-page flash code into display text.
fn warning_message(code: &str) -> Option<String> {
    match code {
        "empty-cart" => Some("Your cart is empty!".to_string()),
        _ => None,
    }
}

/// Display the product listing page with optional category/search filters.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogRepository::new(state.pool());

    let filter = CatalogFilter {
        category_slug: query.category.clone().filter(|s| !s.is_empty()),
        search: query.search.clone().filter(|s| !s.is_empty()),
    };

    let products = catalog.search(&filter).await?;
    let categories = catalog.categories(None).await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductCard::from).collect(),
        categories: categories.iter().map(CategoryView::from).collect(),
        selected_category: filter.category_slug,
        search_query: filter.search,
        logged_in: auth.is_some(),
        warning: query.error.as_deref().and_then(warning_message),
    })
}

/// Display the product detail page.
///
/// Unknown slugs and unavailable products both produce a 404.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogRepository::new(state.pool());

    let product = catalog
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let related = catalog.related(&product).await?;

    let effective = product.effective_price();
    let list_price = (effective < product.price).then(|| filters::format_money(product.price));

    Ok(ProductShowTemplate {
        name: product.name.clone(),
        slug: product.slug.clone(),
        description: product.description.clone(),
        price: filters::format_money(effective),
        list_price,
        in_stock: product.in_stock(),
        product_id: product.id.as_i32(),
        related_products: related.iter().map(ProductCard::from).collect(),
        logged_in: auth.is_some(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use monsoon_core::{CategoryId, ProductId};

    fn product(price: &str, discount: Option<&str>, stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            category_id: CategoryId::new(1),
            name: "Alphonso Mango Box".to_string(),
            slug: "alphonso-mango-box".to_string(),
            description: String::new(),
            price: price.parse().unwrap(),
            discount_price: discount.map(|d| d.parse().unwrap()),
            stock,
            available: true,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_card_without_discount() {
        let card = ProductCard::from(&product("499", None, 3));
        assert_eq!(card.price, "₹499.00");
        assert!(card.list_price.is_none());
        assert!(card.in_stock);
    }

    #[test]
    fn test_product_card_with_discount_shows_list_price() {
        let card = ProductCard::from(&product("499", Some("399"), 0));
        assert_eq!(card.price, "₹399.00");
        assert_eq!(card.list_price.as_deref(), Some("₹499.00"));
        assert!(!card.in_stock);
    }

    #[test]
    fn test_product_card_ignores_bogus_discount() {
        let card = ProductCard::from(&product("499", Some("599"), 1));
        assert_eq!(card.price, "₹499.00");
        assert!(card.list_price.is_none());
    }

    #[test]
    fn test_warning_message_codes() {
        assert_eq!(
            warning_message("empty-cart").unwrap(),
            "Your cart is empty!"
        );
        assert!(warning_message("unknown").is_none());
    }
}
