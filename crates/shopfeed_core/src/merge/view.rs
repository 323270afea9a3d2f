//! Drop/recreate and fetch of the `merged_orders` table.
//!
//! # Responsibility
//! - Materialize the order-to-product left join as a plain table.
//! - Return typed rows for reporting and inspection.
//!
//! # Invariants
//! - One output row per source order row after `DISTINCT` elimination.
//! - Orders with a dangling `productId` appear with NULL product columns.
//! - Row ordering of the fetched view is not a contract.

use crate::db::DbError;
use crate::model::merged::MergedOrder;
use log::{error, info};
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const MERGED_SELECT_SQL: &str = "SELECT
    order_id,
    product_id,
    currency,
    ordered_quantity,
    shipping_cost,
    order_amount,
    order_channel,
    order_channel_group,
    order_campaign,
    ordered_date,
    product_name,
    product_category,
    product_sub_category
FROM merged_orders";

pub type MergeResult<T> = Result<T, MergeError>;

/// Merge-layer error for view rebuild and result decoding.
#[derive(Debug)]
pub enum MergeError {
    Db(DbError),
    InvalidData(String),
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid merged row: {message}"),
        }
    }
}

impl Error for MergeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for MergeError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MergeError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Drops any existing `merged_orders` table and recreates it from the
/// current base-table contents.
///
/// Returns the number of rows in the rebuilt view.
pub fn rebuild_merged_view(conn: &Connection) -> MergeResult<u64> {
    let started_at = Instant::now();
    info!("event=view_rebuild module=merge status=start");

    let result = rebuild(conn);
    match &result {
        Ok(rows) => info!(
            "event=view_rebuild module=merge status=ok rows={rows} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=view_rebuild module=merge status=error duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn rebuild(conn: &Connection) -> MergeResult<u64> {
    conn.execute_batch("DROP TABLE IF EXISTS merged_orders;")?;
    conn.execute_batch(
        "CREATE TABLE merged_orders AS
         SELECT DISTINCT
            orders.orderId AS order_id,
            orders.productId AS product_id,
            orders.currency AS currency,
            orders.quantity AS ordered_quantity,
            orders.shippingCost AS shipping_cost,
            orders.amount AS order_amount,
            orders.channel AS order_channel,
            orders.channelGroup AS order_channel_group,
            orders.campaign AS order_campaign,
            orders.dateTime AS ordered_date,
            products.name AS product_name,
            products.category AS product_category,
            products.subCategory AS product_sub_category
         FROM orders
         LEFT JOIN products ON orders.productId = products.productId;",
    )?;

    let rows = conn.query_row("SELECT COUNT(*) FROM merged_orders;", [], |row| row.get(0))?;
    Ok(rows)
}

/// Returns the full contents of the derived view.
///
/// For reporting and inspection only; row order is unspecified.
pub fn fetch_merged_view(conn: &Connection) -> MergeResult<Vec<MergedOrder>> {
    fetch(conn, None)
}

/// Returns the first `limit` rows of the derived view for human inspection.
pub fn fetch_merged_sample(conn: &Connection, limit: u32) -> MergeResult<Vec<MergedOrder>> {
    fetch(conn, Some(limit))
}

fn fetch(conn: &Connection, limit: Option<u32>) -> MergeResult<Vec<MergedOrder>> {
    let sql = match limit {
        Some(limit) => format!("{MERGED_SELECT_SQL} LIMIT {limit};"),
        None => format!("{MERGED_SELECT_SQL};"),
    };

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut merged = Vec::new();

    while let Some(row) = rows.next()? {
        merged.push(parse_merged_row(row)?);
    }

    Ok(merged)
}

fn parse_merged_row(row: &Row<'_>) -> MergeResult<MergedOrder> {
    Ok(MergedOrder {
        order_id: row.get("order_id")?,
        product_id: row.get("product_id")?,
        currency: row.get("currency")?,
        ordered_quantity: row.get("ordered_quantity")?,
        shipping_cost: row.get("shipping_cost")?,
        order_amount: row.get("order_amount")?,
        order_channel: row.get("order_channel")?,
        order_channel_group: row.get("order_channel_group")?,
        order_campaign: row.get("order_campaign")?,
        ordered_date: row.get("ordered_date")?,
        product_name: row.get("product_name")?,
        product_category: row.get("product_category")?,
        product_sub_category: row.get("product_sub_category")?,
    })
}
