//! Domain records for catalog, orders and the derived merge output.
//!
//! # Responsibility
//! - Define the canonical record shapes shared by loader, store and merge.
//! - Keep CSV header naming concerns inside serde attributes, not callers.
//!
//! # Invariants
//! - `Product` is identified by `product_id`, `Order` by `order_id`.
//! - `MergedOrder` has no identity of its own; it is always recomputed.

pub mod merged;
pub mod order;
pub mod product;
