//! Batch ingestion entry point.
//!
//! # Responsibility
//! - Resolve the customer folder and its two required input files.
//! - Drive one core pipeline run and print the merged-view sample.
//! - Archive consumed inputs with a timestamp suffix after a committed run.
//!
//! Concurrent invocations for the same customer folder are not safe; the
//! caller must serialize runs per customer (cross-customer runs are fine).

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use shopfeed_core::{
    fetch_merged_sample, load_orders, load_products, open_customer_db, IngestService,
};
use std::fs;
use std::path::{Path, PathBuf};

const INVENTORY_FILE: &str = "inventory.csv";
const ORDERS_FILE: &str = "orders.csv";

/// Ingests one customer folder into its SQLite store and rebuilds the
/// merged orders view.
#[derive(Debug, Parser)]
#[command(name = "shopfeed", version)]
struct Args {
    /// Customer folder containing inventory.csv and orders.csv.
    customer_folder: PathBuf,

    /// Folder that consumed input files are archived into.
    #[arg(long, default_value = "processed_files")]
    processed_dir: PathBuf,

    /// Base directory for customer database files.
    /// Defaults to the customer folder's parent directory.
    #[arg(long)]
    db_dir: Option<PathBuf>,

    /// Directory for rolling log files. Defaults to `<cwd>/logs`.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Number of merged rows to print after the run.
    #[arg(long, default_value_t = 5)]
    sample: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref());

    if !args.customer_folder.is_dir() {
        bail!(
            "customer folder does not exist: {}",
            args.customer_folder.display()
        );
    }

    let customer_id = customer_id_from_folder(&args.customer_folder)?;
    let inventory_path = args.customer_folder.join(INVENTORY_FILE);
    let orders_path = args.customer_folder.join(ORDERS_FILE);

    // Inputs are loaded before the store is opened, so a missing or empty
    // file aborts the run without creating or touching the database.
    let products = load_products(&inventory_path)
        .with_context(|| format!("loading catalog for customer `{customer_id}`"))?;
    let orders = load_orders(&orders_path)
        .with_context(|| format!("loading orders for customer `{customer_id}`"))?;

    let db_base_dir = match &args.db_dir {
        Some(dir) => dir.clone(),
        None => parent_dir(&args.customer_folder),
    };
    let mut conn = open_customer_db(&db_base_dir, &customer_id)
        .with_context(|| format!("opening store for customer `{customer_id}`"))?;

    let report = IngestService::new(&mut conn)
        .run_batch(&products, &orders)
        .with_context(|| format!("ingestion run for customer `{customer_id}`"))?;

    println!(
        "customer `{customer_id}`: {} products, {} orders upserted; merged view has {} rows",
        report.products_upserted, report.orders_upserted, report.merged_rows
    );

    let sample = fetch_merged_sample(&conn, args.sample)
        .with_context(|| format!("reading merged sample for customer `{customer_id}`"))?;
    for row in &sample {
        println!(
            "  {} product={} ({}) qty={} amount={} {}",
            row.order_id,
            row.product_id,
            row.product_name.as_deref().unwrap_or("-"),
            row.ordered_quantity,
            row.order_amount,
            row.currency
        );
    }

    archive_inputs(&args.processed_dir, &inventory_path, &orders_path)
        .with_context(|| format!("archiving inputs for customer `{customer_id}`"))?;
    println!("input files moved to `{}`", args.processed_dir.display());

    Ok(())
}

fn init_logging(log_dir: Option<&Path>) {
    let dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(cwd) => cwd.join("logs"),
            Err(_) => return,
        },
    };

    let Some(dir) = dir.to_str() else {
        eprintln!("warning: log directory is not valid UTF-8, file logging disabled");
        return;
    };

    if let Err(err) = shopfeed_core::init_logging(shopfeed_core::default_log_level(), dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
}

fn customer_id_from_folder(folder: &Path) -> Result<String> {
    let name = folder
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| {
            format!(
                "cannot derive customer id from folder `{}`",
                folder.display()
            )
        })?;
    Ok(name.to_string())
}

fn parent_dir(folder: &Path) -> PathBuf {
    match folder.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Moves both consumed inputs into the processed folder, suffixing the file
/// stem with a timestamp so repeated runs never collide.
fn archive_inputs(processed_dir: &Path, inventory_path: &Path, orders_path: &Path) -> Result<()> {
    fs::create_dir_all(processed_dir).with_context(|| {
        format!(
            "creating processed folder `{}`",
            processed_dir.display()
        )
    })?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    move_with_timestamp(inventory_path, processed_dir, "inventory", &timestamp)?;
    move_with_timestamp(orders_path, processed_dir, "orders", &timestamp)?;

    info!("event=archive_inputs module=cli status=ok timestamp={timestamp}");
    Ok(())
}

fn move_with_timestamp(
    source: &Path,
    processed_dir: &Path,
    stem: &str,
    timestamp: &str,
) -> Result<()> {
    let target = processed_dir.join(format!("{stem}_{timestamp}.csv"));

    if fs::rename(source, &target).is_ok() {
        return Ok(());
    }

    // Rename cannot cross filesystems; fall back to copy + remove.
    fs::copy(source, &target).with_context(|| {
        format!(
            "moving `{}` to `{}`",
            source.display(),
            target.display()
        )
    })?;
    fs::remove_file(source).with_context(|| format!("removing `{}`", source.display()))?;
    Ok(())
}
