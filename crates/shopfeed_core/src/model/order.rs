//! Order record.
//!
//! # Invariants
//! - `order_id` is the natural key; re-ingesting the same id overwrites
//!   every other field (last-write-wins).
//! - `product_id` may reference a product that is not (yet) in the catalog.
//! - `quantity`, monetary fields and `date_time` are deliberately not
//!   range/format validated; the pipeline preserves the permissiveness of
//!   the input feed.

use serde::{Deserialize, Serialize};

/// One row of the per-customer orders input.
///
/// Serde renames match the exact CSV header names, so the loader can match
/// columns by name regardless of column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Natural key. Stable across runs for the same order.
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Reference into the product catalog. May dangle.
    #[serde(rename = "productId")]
    pub product_id: String,
    pub currency: String,
    /// Expected >= 0 but not enforced.
    pub quantity: i64,
    #[serde(rename = "shippingCost")]
    pub shipping_cost: f64,
    pub amount: f64,
    pub channel: String,
    #[serde(rename = "channelGroup")]
    pub channel_group: String,
    /// Free-form, frequently empty.
    pub campaign: String,
    /// Opaque timestamp text, stored as-is.
    #[serde(rename = "dateTime")]
    pub date_time: String,
}
