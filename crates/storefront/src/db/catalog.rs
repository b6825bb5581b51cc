//! Catalog repository for category and product reads.
//!
//! The catalog is read-only from the storefront's perspective; writes happen
//! through seeding and staff tooling. Every shopper-facing query filters on
//! `available = TRUE`, except the by-ID lookup used by add-to-cart.

use sqlx::PgPool;

use monsoon_core::ProductId;

use super::RepositoryError;
use crate::models::{Category, Product};

/// Number of related products shown on a product detail page.
pub const RELATED_LIMIT: i64 = 4;

/// Optional filters for the product listing page.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    /// Exact category slug match.
    pub category_slug: Option<String>,
    /// Case-insensitive substring over name or description.
    pub search: Option<String>,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Featured, available products for the homepage, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price, discount_price,
                   stock, available, featured, created_at, updated_at
            FROM products
            WHERE featured AND available
            ORDER BY created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// All categories in name order, optionally limited.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self, limit: Option<i64>) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, created_at
            FROM categories
            ORDER BY name
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Available products matching the filter, newest first.
    ///
    /// The search term matches the product name or description as a
    /// case-insensitive substring.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, filter: &CatalogFilter) -> Result<Vec<Product>, RepositoryError> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT p.id, p.category_id, p.name, p.slug, p.description, p.price,
                   p.discount_price, p.stock, p.available, p.featured,
                   p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.available
              AND ($1::text IS NULL OR c.slug = $1)
              AND ($2::text IS NULL OR p.name ILIKE $2 OR p.description ILIKE $2)
            ORDER BY p.created_at DESC
            ",
        )
        .bind(filter.category_slug.as_deref())
        .bind(pattern.as_deref())
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get an available product by its slug.
    ///
    /// Returns `None` for unknown slugs and for products that exist but are
    /// not available - shoppers cannot tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price, discount_price,
                   stock, available, featured, created_at, updated_at
            FROM products
            WHERE slug = $1 AND available
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by ID regardless of availability.
    ///
    /// Add-to-cart resolves products by ID and does not require the
    /// availability flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price, discount_price,
                   stock, available, featured, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Up to [`RELATED_LIMIT`] available products in the same category,
    /// excluding the product itself.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(&self, product: &Product) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price, discount_price,
                   stock, available, featured, created_at, updated_at
            FROM products
            WHERE category_id = $1 AND available AND id <> $2
            ORDER BY created_at DESC
            LIMIT $3
            ",
        )
        .bind(product.category_id)
        .bind(product.id)
        .bind(RELATED_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}

/// Build an ILIKE pattern for a substring search, escaping LIKE wildcards.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_plain() {
        assert_eq!(like_pattern("mango"), "%mango%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
