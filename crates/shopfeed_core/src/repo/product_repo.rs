//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide idempotent upsert APIs over the canonical `products` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `productId` identifies at most one row at any time.
//! - Upserting an existing id overwrites every non-key column
//!   (true upsert, not insert-or-ignore).

use super::{ensure_migrated, RepoResult};
use crate::model::product::Product;
use rusqlite::{params, Connection, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    productId,
    name,
    category,
    subCategory
FROM products";

/// Repository interface for product catalog persistence.
pub trait ProductRepository {
    /// Inserts the product or overwrites all non-key columns on conflict.
    fn upsert_product(&self, product: &Product) -> RepoResult<()>;
    /// Applies a batch in input order; later duplicate ids win.
    /// Returns the number of records applied.
    fn upsert_products(&self, products: &[Product]) -> RepoResult<usize>;
    /// Gets one product by natural key.
    fn get_product(&self, product_id: &str) -> RepoResult<Option<Product>>;
    /// Returns the current number of catalog rows.
    fn count_products(&self) -> RepoResult<u64>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a bootstrapped connection, rejecting unmigrated ones.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn, "products")?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn upsert_product(&self, product: &Product) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO products (productId, name, category, subCategory)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(productId) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                subCategory = excluded.subCategory;",
            params![
                product.product_id,
                product.name,
                product.category,
                product.sub_category,
            ],
        )?;
        Ok(())
    }

    fn upsert_products(&self, products: &[Product]) -> RepoResult<usize> {
        for product in products {
            self.upsert_product(product)?;
        }
        Ok(products.len())
    }

    fn get_product(&self, product_id: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE productId = ?1;"))?;

        let mut rows = stmt.query([product_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn count_products(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    Ok(Product {
        product_id: row.get("productId")?,
        name: row.get("name")?,
        category: row.get("category")?,
        sub_category: row.get("subCategory")?,
    })
}
