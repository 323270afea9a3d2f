//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the upsert-oriented data access contracts for the two base
//!   tables.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Batch upserts apply records strictly in input order, so within one
//!   batch a later record for the same key wins over an earlier one.
//! - Upserts never delete rows; base tables only accumulate or overwrite.
//! - Repositories refuse to operate on a connection whose schema has not
//!   been migrated.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod order_repo;
pub mod product_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for base-table persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The connection's `user_version` does not match the schema this
    /// binary expects; the caller skipped `db::open_*` bootstrap.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open the store via db::open_customer_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted row: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies the connection has been bootstrapped and carries `table`.
pub(crate) fn ensure_migrated(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let present: u32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [table],
        |row| row.get(0),
    )?;
    if present == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}
