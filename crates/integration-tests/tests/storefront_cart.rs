//! Integration tests for the cart flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A seeded catalog (cargo run -p monsoon-cli -- seed)
//! - The storefront running (cargo run -p monsoon-storefront)
//!
//! Run with: cargo test -p monsoon-integration-tests -- --ignored

use monsoon_integration_tests::{client, register_and_login, storefront_base_url};
use reqwest::{Client, StatusCode};

/// Find the add-to-cart path of the first product on the listing page.
async fn first_add_to_cart_path(client: &Client) -> String {
    let base_url = storefront_base_url();
    let body = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to fetch product listing")
        .text()
        .await
        .expect("Failed to read listing body");

    let product_path = body
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

    detail
        .split('"')
        .find(|s| s.starts_with("/add-to-cart/"))
        .expect("No add-to-cart form on the detail page")
        .to_string()
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_cart_requires_login() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");

    // Redirected to the login page with a return path
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().starts_with("/login"));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_add_twice_merges_into_one_line() {
    let client = client();
    let base_url = storefront_base_url();
    register_and_login(&client).await;

    let add_path = first_add_to_cart_path(&client).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}{add_path}"))
            .send()
            .await
            .expect("Failed to add to cart");
        assert!(resp.status().is_success());
    }

    let body = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart body");

    // One line with quantity 2, not two lines
    assert_eq!(body.matches("/remove-from-cart/").count(), 1);
    assert!(body.contains(r#"value="2""#));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_update_to_zero_removes_line() {
    let client = client();
    let base_url = storefront_base_url();
    register_and_login(&client).await;

    let add_path = first_add_to_cart_path(&client).await;
    client
        .post(format!("{base_url}{add_path}"))
        .send()
        .await
        .expect("Failed to add to cart");

    let cart = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart body");

    let update_path = cart
        .split('"')
        .find(|s| s.starts_with("/update-cart/"))
        .expect("No update form in cart")
        .to_string();

    let resp = client
        .post(format!("{base_url}{update_path}"))
        .form(&[("quantity", "0")])
        .send()
        .await
        .expect("Failed to update cart");
    assert!(resp.status().is_success());

    let body = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .text()
        .await
        .expect("Failed to read cart body");

    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_unknown_product_detail_is_404() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/product/does-not-exist"))
        .send()
        .await
        .expect("Failed to fetch detail page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
