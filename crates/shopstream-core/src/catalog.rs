//! Read-only product catalog owned by the storefront.

use serde::{Deserialize, Serialize};

/// A catalog product as seen by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: i32,
    /// Owning brand, if any.
    pub brand_id: Option<i32>,
    /// Category, if any.
    pub category_id: Option<i32>,
    /// Whether the product can currently be bought.
    pub available: bool,
    /// Whether the product has been soft-deleted.
    pub deleted: bool,
}

impl Product {
    /// Returns true when the product may be recommended.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.available && !self.deleted
    }
}

/// A catalog brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Brand identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
}
