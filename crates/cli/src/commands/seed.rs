//! Catalog seeding command.
//!
//! Loads categories and products from a YAML fixture file and upserts them
//! by slug, so re-running the command refreshes existing rows instead of
//! duplicating them.

use std::path::Path;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;

use super::{CliError, database_url};

/// Top-level fixture file structure.
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    categories: Vec<CategoryFixture>,
}

/// One category and its products.
#[derive(Debug, Deserialize)]
struct CategoryFixture {
    name: String,
    slug: String,
    #[serde(default)]
    products: Vec<ProductFixture>,
}

/// One product. Prices are decimal strings (e.g. "120.00").
#[derive(Debug, Deserialize)]
struct ProductFixture {
    name: String,
    slug: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    discount_price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
    #[serde(default = "default_true")]
    available: bool,
    #[serde(default)]
    featured: bool,
}

const fn default_true() -> bool {
    true
}

/// Seed the catalog from a fixture file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any
/// database operation fails.
pub async fn run(file: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(file).map_err(|source| CliError::ReadFile {
        path: file.to_path_buf(),
        source,
    })?;
    let fixture: CatalogFixture = serde_yaml::from_str(&raw)?;

    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let mut product_count = 0_usize;

    for category in &fixture.categories {
        let category_id = upsert_category(&pool, category).await?;

        for product in &category.products {
            upsert_product(&pool, category_id, product).await?;
            product_count += 1;
        }

        tracing::info!(
            category = %category.slug,
            products = category.products.len(),
            "seeded category"
        );
    }

    tracing::info!(
        categories = fixture.categories.len(),
        products = product_count,
        "catalog seed complete"
    );
    Ok(())
}

/// Insert or refresh a category by slug, returning its ID.
async fn upsert_category(pool: &PgPool, category: &CategoryFixture) -> Result<i32, CliError> {
    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO categories (name, slug)
        VALUES ($1, $2)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        ",
    )
    .bind(&category.name)
    .bind(&category.slug)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Insert or refresh a product by slug.
async fn upsert_product(
    pool: &PgPool,
    category_id: i32,
    product: &ProductFixture,
) -> Result<(), CliError> {
    sqlx::query(
        r"
        INSERT INTO products (category_id, name, slug, description, price,
                              discount_price, stock, available, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (slug) DO UPDATE SET
            category_id = EXCLUDED.category_id,
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            price = EXCLUDED.price,
            discount_price = EXCLUDED.discount_price,
            stock = EXCLUDED.stock,
            available = EXCLUDED.available,
            featured = EXCLUDED.featured,
            updated_at = NOW()
        ",
    )
    .bind(category_id)
    .bind(&product.name)
    .bind(&product.slug)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.discount_price)
    .bind(product.stock)
    .bind(product.available)
    .bind(product.featured)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses() {
        let yaml = r#"
categories:
  - name: Spices
    slug: spices
    products:
      - name: Kashmiri Chilli Powder
        slug: kashmiri-chilli-powder
        description: Mild and vividly red.
        price: "120.00"
        discount_price: "99.00"
        stock: 40
        featured: true
  - name: Teas
    slug: teas
"#;
        let fixture: CatalogFixture = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(fixture.categories.len(), 2);

        let spices = &fixture.categories[0];
        assert_eq!(spices.products.len(), 1);
        let chilli = &spices.products[0];
        assert_eq!(chilli.price, "120.00".parse().unwrap());
        assert_eq!(chilli.discount_price, Some("99.00".parse().unwrap()));
        assert!(chilli.available, "availability defaults to true");
        assert!(chilli.featured);

        assert!(fixture.categories[1].products.is_empty());
    }

    #[test]
    fn test_fixture_rejects_missing_price() {
        let yaml = r"
categories:
  - name: Spices
    slug: spices
    products:
      - name: No Price
        slug: no-price
";
        assert!(serde_yaml::from_str::<CatalogFixture>(yaml).is_err());
    }
}
