//! Order repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide idempotent upsert APIs over the canonical `orders` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `orderId` identifies at most one row at any time.
//! - Upserting an existing id overwrites every non-key column, including
//!   the `productId` reference.
//! - `productId` is allowed to reference a product absent from the catalog.

use super::{ensure_migrated, RepoResult};
use crate::model::order::Order;
use rusqlite::{params, Connection, Row};

const ORDER_SELECT_SQL: &str = "SELECT
    orderId,
    productId,
    currency,
    quantity,
    shippingCost,
    amount,
    channel,
    channelGroup,
    campaign,
    dateTime
FROM orders";

/// Repository interface for order persistence.
pub trait OrderRepository {
    /// Inserts the order or overwrites all non-key columns on conflict.
    fn upsert_order(&self, order: &Order) -> RepoResult<()>;
    /// Applies a batch in input order; later duplicate ids win.
    /// Returns the number of records applied.
    fn upsert_orders(&self, orders: &[Order]) -> RepoResult<usize>;
    /// Gets one order by natural key.
    fn get_order(&self, order_id: &str) -> RepoResult<Option<Order>>;
    /// Returns the current number of order rows.
    fn count_orders(&self) -> RepoResult<u64>;
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderRepository<'conn> {
    /// Wraps a bootstrapped connection, rejecting unmigrated ones.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn, "orders")?;
        Ok(Self { conn })
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn upsert_order(&self, order: &Order) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO orders (
                orderId,
                productId,
                currency,
                quantity,
                shippingCost,
                amount,
                channel,
                channelGroup,
                campaign,
                dateTime
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(orderId) DO UPDATE SET
                productId = excluded.productId,
                currency = excluded.currency,
                quantity = excluded.quantity,
                shippingCost = excluded.shippingCost,
                amount = excluded.amount,
                channel = excluded.channel,
                channelGroup = excluded.channelGroup,
                campaign = excluded.campaign,
                dateTime = excluded.dateTime;",
            params![
                order.order_id,
                order.product_id,
                order.currency,
                order.quantity,
                order.shipping_cost,
                order.amount,
                order.channel,
                order.channel_group,
                order.campaign,
                order.date_time,
            ],
        )?;
        Ok(())
    }

    fn upsert_orders(&self, orders: &[Order]) -> RepoResult<usize> {
        for order in orders {
            self.upsert_order(order)?;
        }
        Ok(orders.len())
    }

    fn get_order(&self, order_id: &str) -> RepoResult<Option<Order>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORDER_SELECT_SQL} WHERE orderId = ?1;"))?;

        let mut rows = stmt.query([order_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_order_row(row)?));
        }
        Ok(None)
    }

    fn count_orders(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_order_row(row: &Row<'_>) -> RepoResult<Order> {
    Ok(Order {
        order_id: row.get("orderId")?,
        product_id: row.get("productId")?,
        currency: row.get("currency")?,
        quantity: row.get("quantity")?,
        shipping_cost: row.get("shippingCost")?,
        amount: row.get("amount")?,
        channel: row.get("channel")?,
        channel_group: row.get("channelGroup")?,
        campaign: row.get("campaign")?,
        date_time: row.get("dateTime")?,
    })
}
