//! CSV decoding for catalog and order inputs.
//!
//! # Responsibility
//! - Read header-addressed CSV files into `Product` / `Order` batches.
//! - Map csv-crate failures into the loader error taxonomy.
//!
//! # Invariants
//! - Columns are matched by header name, never by position.
//! - Cell values are decoded to the record's types but not range/format
//!   validated beyond that.

use super::{LoadError, LoadResult};
use crate::model::order::Order;
use crate::model::product::Product;
use log::{error, info};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Instant;

/// Loads the product catalog input (`productId,name,category,subCategory`).
pub fn load_products(path: impl AsRef<Path>) -> LoadResult<Vec<Product>> {
    load_records(path.as_ref(), "products")
}

/// Loads the orders input
/// (`orderId,productId,currency,quantity,shippingCost,amount,channel,channelGroup,campaign,dateTime`).
pub fn load_orders(path: impl AsRef<Path>) -> LoadResult<Vec<Order>> {
    load_records(path.as_ref(), "orders")
}

fn load_records<T: DeserializeOwned>(path: &Path, input: &'static str) -> LoadResult<Vec<T>> {
    let started_at = Instant::now();
    info!(
        "event=load_input module=load status=start input={input} path={}",
        path.display()
    );

    let result = read_rows(path);
    match &result {
        Ok(rows) => info!(
            "event=load_input module=load status=ok input={input} rows={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=load_input module=load status=error input={input} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> LoadResult<Vec<T>> {
    if !path.exists() {
        return Err(LoadError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|err| csv_error(path, err))?;

    let mut rows = Vec::new();
    for decoded in reader.deserialize::<T>() {
        rows.push(decoded.map_err(|err| csv_error(path, err))?);
    }

    if rows.is_empty() {
        return Err(LoadError::EmptyInput(path.to_path_buf()));
    }
    Ok(rows)
}

fn csv_error(path: &Path, err: csv::Error) -> LoadError {
    let line = err.position().map_or(0, csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => LoadError::Malformed {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}
