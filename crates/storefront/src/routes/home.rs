//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::catalog::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::products::{CategoryView, ProductCard};
use crate::state::AppState;

/// Number of featured products shown on the homepage.
const FEATURED_LIMIT: i64 = 8;

/// Number of categories shown on the homepage.
const CATEGORY_LIMIT: i64 = 6;

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured_products: Vec<ProductCard>,
    pub categories: Vec<CategoryView>,
    pub logged_in: bool,
    pub success: Option<String>,
}

/// Decode a home-page flash code into display text.
fn success_message(code: &str) -> Option<String> {
    match code {
        "logged-out" => Some("You have been logged out.".to_string()),
        _ => None,
    }
}

/// Display the home page.
#[instrument(skip(state, auth))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogRepository::new(state.pool());

    let featured = catalog.featured(FEATURED_LIMIT).await?;
    let categories = catalog.categories(Some(CATEGORY_LIMIT)).await?;

    Ok(HomeTemplate {
        featured_products: featured.iter().map(ProductCard::from).collect(),
        categories: categories.iter().map(CategoryView::from).collect(),
        logged_in: auth.is_some(),
        success: query.success.as_deref().and_then(success_message),
    })
}
