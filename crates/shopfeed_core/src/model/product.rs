//! Product catalog record.
//!
//! # Invariants
//! - `product_id` is the natural key; re-ingesting the same id overwrites
//!   every other field (last-write-wins).
//! - No field is validated beyond being present and decodable as text.

use serde::{Deserialize, Serialize};

/// One row of the per-customer product catalog input.
///
/// Serde renames match the exact CSV header names, so the loader can match
/// columns by name regardless of column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Natural key. Stable across runs for the same catalog entry.
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    pub category: String,
    #[serde(rename = "subCategory")]
    pub sub_category: String,
}

impl Product {
    /// Creates a product record from owned or borrowed parts.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            category: category.into(),
            sub_category: sub_category.into(),
        }
    }
}
