//! Test catalog — fixed in-memory `ProductCatalog`.

use async_trait::async_trait;
use shopstream_core::catalog::{Brand, Product};
use shopstream_core::error::DomainError;
use shopstream_core::repository::ProductCatalog;

/// A catalog that serves the products and brands it was built with.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    brands: Vec<Brand>,
}

impl StaticCatalog {
    /// Creates a catalog from explicit products and brands.
    #[must_use]
    pub fn new(products: Vec<Product>, brands: Vec<Brand>) -> Self {
        Self { products, brands }
    }

    /// Adds a listed product of `brand_id` in `category_id`.
    #[must_use]
    pub fn with_product(
        mut self,
        id: i32,
        brand_id: Option<i32>,
        category_id: Option<i32>,
    ) -> Self {
        self.products.push(Product {
            id,
            brand_id,
            category_id,
            available: true,
            deleted: false,
        });
        self
    }

    /// Adds a brand.
    #[must_use]
    pub fn with_brand(mut self, id: i32, name: &str) -> Self {
        self.brands.push(Brand {
            id,
            name: name.to_owned(),
        });
        self
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.clone())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        Ok(self.brands.clone())
    }
}
