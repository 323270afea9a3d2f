//! Core pipeline logic for per-customer catalog/order ingestion.
//! This crate is the single source of truth for upsert and merge invariants.

pub mod db;
pub mod load;
pub mod logging;
pub mod merge;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{customer_db_path, open_customer_db, open_db_in_memory, DbError, DbResult};
pub use load::{load_orders, load_products, LoadError, LoadResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use merge::view::{
    fetch_merged_sample, fetch_merged_view, rebuild_merged_view, MergeError, MergeResult,
};
pub use model::merged::MergedOrder;
pub use model::order::Order;
pub use model::product::Product;
pub use repo::order_repo::{OrderRepository, SqliteOrderRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use service::ingest_service::{IngestReport, IngestService, PipelineError, PipelineResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
