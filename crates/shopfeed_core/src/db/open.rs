//! Connection bootstrap utilities for per-customer SQLite stores.
//!
//! # Responsibility
//! - Derive the deterministic database file name for a customer identifier.
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and trigger schema migrations before
//!   returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.
//! - Two distinct customer identifiers never map to the same file.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Returns the database file path for one customer store.
///
/// The name is derived deterministically as `<base_dir>/<customer_id>.db`.
/// Identifiers containing path separators are rejected so a crafted customer
/// name cannot escape the base directory.
pub fn customer_db_path(base_dir: impl AsRef<Path>, customer_id: &str) -> DbResult<PathBuf> {
    let trimmed = customer_id.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(DbError::InvalidCustomerId(customer_id.to_string()));
    }
    Ok(base_dir.as_ref().join(format!("{trimmed}.db")))
}

/// Opens the SQLite store for one customer and applies pending migrations.
///
/// # Side effects
/// - Creates the database file on first use.
/// - Emits `db_open` logging events with duration and status.
pub fn open_customer_db(base_dir: impl AsRef<Path>, customer_id: &str) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file customer={customer_id}");

    let path = customer_db_path(base_dir, customer_id)?;
    let mut conn = match Connection::open(&path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file customer={customer_id} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=file customer={customer_id} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file customer={customer_id} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory SQLite store and applies all pending migrations.
///
/// Used by tests and by callers that want pipeline semantics without a
/// durable file.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=memory duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::customer_db_path;
    use crate::db::DbError;
    use std::path::Path;

    #[test]
    fn path_is_deterministic_per_customer() {
        let a = customer_db_path("/var/lib/shopfeed", "customer1_dema").unwrap();
        let b = customer_db_path("/var/lib/shopfeed", "customer1_dema").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Path::new("/var/lib/shopfeed/customer1_dema.db"));
    }

    #[test]
    fn distinct_customers_get_distinct_paths() {
        let a = customer_db_path("/data", "alpha").unwrap();
        let b = customer_db_path("/data", "beta").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn path_separators_in_customer_id_are_rejected() {
        for bad in ["../escape", "a/b", "a\\b", "", "  ", ".", ".."] {
            let err = customer_db_path("/data", bad).unwrap_err();
            assert!(matches!(err, DbError::InvalidCustomerId(_)), "id: {bad}");
        }
    }
}
