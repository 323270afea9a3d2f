//! Transactional ingestion run.
//!
//! # Responsibility
//! - Apply one batch of products and orders and rebuild the merged view as
//!   a single unit of work.
//! - Report counts back to the caller so collaborators (archival, CLI
//!   summary) can act on completion.
//!
//! # Invariants
//! - Product upserts, order upserts and the view rebuild commit together
//!   or not at all; a mid-run failure leaves the prior run's state intact.
//! - Records are applied strictly in input order (last-write-wins for
//!   duplicate keys within a batch).
//! - The connection is an exclusively-owned, scoped resource for the run.
//!   Concurrent runs against the same customer store are a caller
//!   responsibility to prevent; cross-customer stores are independent.

use crate::db::DbError;
use crate::load::LoadError;
use crate::merge::view::{rebuild_merged_view, MergeError};
use crate::model::order::Order;
use crate::model::product::Product;
use crate::repo::order_repo::{OrderRepository, SqliteOrderRepository};
use crate::repo::product_repo::{ProductRepository, SqliteProductRepository};
use crate::repo::RepoError;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Terminal error for one pipeline run.
///
/// Every variant aborts the run; re-running the pipeline is the recovery
/// mechanism and is safe because upserts are idempotent per identifier.
#[derive(Debug)]
pub enum PipelineError {
    Load(LoadError),
    Db(DbError),
    Repo(RepoError),
    Merge(MergeError),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Merge(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Merge(err) => Some(err),
        }
    }
}

impl From<LoadError> for PipelineError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<DbError> for PipelineError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for PipelineError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MergeError> for PipelineError {
    fn from(value: MergeError) -> Self {
        Self::Merge(value)
    }
}

impl From<rusqlite::Error> for PipelineError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of one committed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Product records applied, duplicates included.
    pub products_upserted: usize,
    /// Order records applied, duplicates included.
    pub orders_upserted: usize,
    /// Row count of the rebuilt merged view.
    pub merged_rows: u64,
}

/// Use-case service running one ingestion batch over an open customer store.
pub struct IngestService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> IngestService<'conn> {
    /// Wraps an exclusively-borrowed store connection for one run.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Upserts both batches and rebuilds the merged view in one transaction.
    ///
    /// # Contract
    /// - Applies `products` then `orders`, each in input order.
    /// - Rebuilds `merged_orders` from the post-upsert base tables.
    /// - Commits everything or rolls everything back.
    pub fn run_batch(
        &mut self,
        products: &[Product],
        orders: &[Order],
    ) -> PipelineResult<IngestReport> {
        let started_at = Instant::now();
        info!(
            "event=ingest_run module=service status=start products={} orders={}",
            products.len(),
            orders.len()
        );

        let result = self.run_batch_inner(products, orders);
        match &result {
            Ok(report) => info!(
                "event=ingest_run module=service status=ok products={} orders={} merged_rows={} duration_ms={}",
                report.products_upserted,
                report.orders_upserted,
                report.merged_rows,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=ingest_run module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn run_batch_inner(
        &mut self,
        products: &[Product],
        orders: &[Order],
    ) -> PipelineResult<IngestReport> {
        let tx = self.conn.transaction()?;

        let report = {
            let product_repo = SqliteProductRepository::try_new(&tx)?;
            let products_upserted = product_repo.upsert_products(products)?;

            let order_repo = SqliteOrderRepository::try_new(&tx)?;
            let orders_upserted = order_repo.upsert_orders(orders)?;

            let merged_rows = rebuild_merged_view(&tx)?;

            IngestReport {
                products_upserted,
                orders_upserted,
                merged_rows,
            }
        };

        tx.commit()?;
        Ok(report)
    }
}
