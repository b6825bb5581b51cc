//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (featured products, categories)
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (verifies database)
//!
//! # Catalog
//! GET  /products                 - Product listing (?category=<slug>&search=<text>)
//! GET  /product/{slug}           - Product detail + related products
//!
//! # Auth
//! GET  /register                 - Registration page
//! POST /register                 - Registration action
//! GET  /login                    - Login page (?next= return path)
//! POST /login                    - Login action
//! POST /logout                   - Logout action
//!
//! # Cart (requires auth)
//! GET  /cart                     - Cart page
//! POST /add-to-cart/{product_id} - Add/increment, redirects to referrer
//! POST /update-cart/{cart_id}    - Set quantity; <= 0 deletes the line
//! POST /remove-from-cart/{cart_id} - Delete line
//!
//! # Checkout & orders (requires auth)
//! GET  /checkout                 - Cart summary + shipping form
//! POST /checkout                 - Place the order
//! GET  /orders                   - Order history
//! GET  /order/{order_id}         - Single order detail (owned only)
//!
//! # Profile (requires auth)
//! GET  /profile                  - Shipping profile form
//! POST /profile                  - Update shipping profile
//! ```
//!
//! Flash messages travel as `?success=` / `?error=` query codes and are
//! decoded into human-readable text when the page renders.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/product/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/add-to-cart/{product_id}", post(cart::add))
        .route("/update-cart/{cart_id}", post(cart::update))
        .route("/remove-from-cart/{cart_id}", post(cart::remove))
}

/// Create the checkout and order-history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/orders", get(orders::index))
        .route("/order/{order_id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(catalog_routes())
        .merge(auth_routes())
        .merge(cart_routes())
        .merge(order_routes())
        .route("/profile", get(profile::show).post(profile::update))
}
