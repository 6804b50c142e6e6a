//! `PostgreSQL` implementation of the `ProductCatalog` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use shopstream_core::catalog::{Brand, Product};
use shopstream_core::error::DomainError;
use shopstream_core::repository::ProductCatalog;

use crate::infrastructure;

const LIST_PRODUCTS_SQL: &str = r"
SELECT id, brand_id, category_id, available, deleted_at IS NOT NULL AS deleted
FROM catalog_products
";

const LIST_BRANDS_SQL: &str = "SELECT id, name FROM catalog_brands";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    brand_id: Option<i32>,
    category_id: Option<i32>,
    available: bool,
    deleted: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: i32,
    name: String,
}

/// Reads the storefront catalog tables. The analytics service never writes
/// them.
#[derive(Debug, Clone)]
pub struct PgProductCatalog {
    pool: PgPool,
}

impl PgProductCatalog {
    /// Creates a new `PgProductCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let rows: Vec<ProductRow> = sqlx::query_as(LIST_PRODUCTS_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        Ok(rows
            .into_iter()
            .map(|row| Product {
                id: row.id,
                brand_id: row.brand_id,
                category_id: row.category_id,
                available: row.available,
                deleted: row.deleted,
            })
            .collect())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        let rows: Vec<BrandRow> = sqlx::query_as(LIST_BRANDS_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        Ok(rows
            .into_iter()
            .map(|row| Brand {
                id: row.id,
                name: row.name,
            })
            .collect())
    }
}
