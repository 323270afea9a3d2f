//! Derived order-to-product merge record.

use serde::{Deserialize, Serialize};

/// One row of the rebuilt `merged_orders` table: an order left-joined onto
/// its product's catalog metadata.
///
/// Product fields are `None` when the order references a product id that is
/// absent from the catalog. The row set is fully recomputed on every run and
/// must never carry state of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedOrder {
    pub order_id: String,
    pub product_id: String,
    pub currency: String,
    pub ordered_quantity: i64,
    pub shipping_cost: f64,
    pub order_amount: f64,
    pub order_channel: String,
    pub order_channel_group: String,
    pub order_campaign: String,
    pub ordered_date: String,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub product_sub_category: Option<String>,
}

impl MergedOrder {
    /// Returns whether the order's product reference resolved in the catalog.
    pub fn has_product(&self) -> bool {
        self.product_name.is_some()
    }
}
