//! Integration tests for the checkout workflow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded catalog (cargo run -p monsoon-cli -- seed)
//! - The storefront running (cargo run -p monsoon-storefront)
//!
//! Run with: cargo test -p monsoon-integration-tests -- --ignored

use monsoon_integration_tests::{client, register_and_login, storefront_base_url};
use reqwest::Client;

const SHIPPING_FIELDS: [(&str, &str); 7] = [
    ("full_name", "Asha Rao"),
    ("email", "asha@example.com"),
    ("phone", "9876543210"),
    ("address", "14 MG Road"),
    ("city", "Bengaluru"),
    ("state", "Karnataka"),
    ("pincode", "560001"),
];

/// Add the first catalog product to the logged-in client's cart.
async fn add_first_product(client: &Client) {
    let base_url = storefront_base_url();

    let listing = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to fetch product listing")
        .text()
        .await
        .expect("Failed to read listing body");

    let product_path = listing
        .split('"')
        .find(|s| s.starts_with("/product/"))
        .expect("No product link on the listing page")
        .to_string();

    let detail = client
        .get(format!("{base_url}{product_path}"))
        .send()
        .await
        .expect("Failed to fetch product detail")
        .text()
        .await
        .expect("Failed to read detail body");

    let add_path = detail
        .split('"')
        .find(|s| s.starts_with("/add-to-cart/"))
        .expect("No add-to-cart form on the detail page")
        .to_string();

    let resp = client
        .post(format!("{base_url}{add_path}"))
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.status().is_success());
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_empty_cart_checkout_redirects_to_catalog() {
    let client = client();
    let base_url = storefront_base_url();
    register_and_login(&client).await;

    let resp = client
        .get(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to fetch checkout");

    // Redirected to the catalog with a warning flash
    assert!(resp.url().path().starts_with("/products"));
    assert!(resp.url().query().unwrap_or_default().contains("empty-cart"));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_checkout_creates_order_and_empties_cart() {
    let client = client();
    let base_url = storefront_base_url();
    register_and_login(&client).await;
    add_first_product(&client).await;

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&SHIPPING_FIELDS)
        .send()
        .await
        .expect("Failed to submit checkout");

    // Lands on the order confirmation page
    assert!(resp.url().path().starts_with("/order/"));
    let body = resp.text().await.expect("Failed to read confirmation body");
    assert!(body.contains("Order placed successfully"));
    assert!(body.contains("ORD-"));

    // Cart is now empty
    let cart = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart body");
    assert!(cart.contains("Your cart is empty"));

    // The order shows up in history
    let orders = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to fetch orders")
        .text()
        .await
        .expect("Failed to read orders body");
    assert!(orders.contains("ORD-"));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_checkout_validation_rerenders_with_field_errors() {
    let client = client();
    let base_url = storefront_base_url();
    register_and_login(&client).await;
    add_first_product(&client).await;

    let mut fields = SHIPPING_FIELDS;
    fields[6] = ("pincode", "12");

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&fields)
        .send()
        .await
        .expect("Failed to submit checkout");

    // Re-rendered in place, not redirected
    assert!(resp.url().path().starts_with("/checkout"));
    let body = resp.text().await.expect("Failed to read checkout body");
    assert!(body.contains("6-digit pincode"));

    // No order was created
    let orders = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to fetch orders")
        .text()
        .await
        .expect("Failed to read orders body");
    assert!(!orders.contains("ORD-"));
}
