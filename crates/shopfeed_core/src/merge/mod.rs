//! Derived-view materialization.
//!
//! # Responsibility
//! - Rebuild the denormalized `merged_orders` table from the base tables.
//! - Expose read access to the rebuilt view for reporting.
//!
//! # Invariants
//! - The view is always dropped and recreated whole; it never carries rows
//!   from a previous run.
//! - The view is exactly the left join of current orders onto current
//!   products, with full-row duplicate elimination.

pub mod view;
