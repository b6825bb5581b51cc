//! Integration tests for Monsoon.
//!
//! # Running Tests
//!
//! These tests drive a running storefront over HTTP, so they are
//! `#[ignore]`d by default. To run them:
//!
//! ```bash
//! # Start the database, migrate, and seed
//! cargo run -p monsoon-cli -- migrate
//! cargo run -p monsoon-cli -- seed
//!
//! # Start the storefront
//! cargo run -p monsoon-storefront
//!
//! # Run the ignored tests
//! cargo test -p monsoon-integration-tests -- --ignored
//! ```
//!
//! The base URL defaults to `http://localhost:8000` and can be overridden
//! with `STOREFRONT_BASE_URL`.
//!
//! # Test Categories
//!
//! - `storefront_cart` - cart add/update/remove flows
//! - `storefront_checkout` - the cart-to-order workflow

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Create an HTTP client that keeps session cookies and follows redirects.
///
/// # Panics
///
/// Panics if the client cannot be constructed (test-only code).
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a fresh account and leave the client's session logged in.
///
/// Returns the generated username.
///
/// # Panics
///
/// Panics if registration or login fails (test-only code).
pub async fn register_and_login(client: &Client) -> String {
    let base_url = storefront_base_url();
    let username = format!("shopper_{}", uuid::Uuid::new_v4().simple());

    let resp = client
        .post(format!("{base_url}/register"))
        .form(&[
            ("username", username.as_str()),
            ("email", "shopper@example.com"),
            ("password", "integration-pass"),
            ("password_confirm", "integration-pass"),
        ])
        .send()
        .await
        .expect("Failed to register");
    assert!(resp.status().is_success(), "registration failed");

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[
            ("username", username.as_str()),
            ("password", "integration-pass"),
        ])
        .send()
        .await
        .expect("Failed to login");
    assert!(resp.status().is_success(), "login failed");

    username
}
