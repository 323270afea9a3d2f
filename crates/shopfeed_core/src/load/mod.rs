//! Input loading layer.
//!
//! # Responsibility
//! - Turn the two per-customer CSV inputs into ordered, typed record batches.
//! - Surface missing/empty/undecodable inputs as terminal errors before any
//!   store access happens.
//!
//! # Invariants
//! - Loading never mutates the store; all loader failures leave the
//!   customer database untouched.
//! - Record order in the returned batch equals row order in the file.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod csv_input;

pub use csv_input::{load_orders, load_products};

pub type LoadResult<T> = Result<T, LoadError>;

/// Loader error for the two CSV inputs.
#[derive(Debug)]
pub enum LoadError {
    /// The input file does not exist.
    MissingInput(PathBuf),
    /// The input file exists but contains zero data rows.
    EmptyInput(PathBuf),
    /// A data row could not be decoded into the typed record, e.g. a
    /// missing column or a non-numeric quantity.
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },
    /// Underlying I/O failure while reading the file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput(path) => {
                write!(f, "input file does not exist: {}", path.display())
            }
            Self::EmptyInput(path) => {
                write!(f, "input file has no data rows: {}", path.display())
            }
            Self::Malformed {
                path,
                line,
                message,
            } => write!(
                f,
                "malformed row at {}:{line}: {message}",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
