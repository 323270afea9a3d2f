use shopfeed_core::{
    customer_db_path, fetch_merged_view, load_orders, load_products, open_customer_db,
    open_db_in_memory, IngestService, LoadError, MergedOrder, Order, OrderRepository,
    PipelineError, Product, ProductRepository, RepoError, SqliteOrderRepository,
    SqliteProductRepository,
};
use std::fs;

fn widget() -> Product {
    Product::new("P1", "Widget", "Tools", "Hand")
}

fn widget_order() -> Order {
    Order {
        order_id: "O1".to_string(),
        product_id: "P1".to_string(),
        currency: "USD".to_string(),
        quantity: 2,
        shipping_cost: 5.00,
        amount: 19.98,
        channel: "web".to_string(),
        channel_group: "direct".to_string(),
        campaign: String::new(),
        date_time: "2024-01-01".to_string(),
    }
}

#[test]
fn single_order_scenario_produces_expected_merged_row() {
    let mut conn = open_db_in_memory().unwrap();

    let report = IngestService::new(&mut conn)
        .run_batch(&[widget()], &[widget_order()])
        .unwrap();

    assert_eq!(report.products_upserted, 1);
    assert_eq!(report.orders_upserted, 1);
    assert_eq!(report.merged_rows, 1);

    let merged = fetch_merged_view(&conn).unwrap();
    assert_eq!(merged.len(), 1);
    let row = &merged[0];
    assert_eq!(row.order_id, "O1");
    assert_eq!(row.product_id, "P1");
    assert_eq!(row.product_name.as_deref(), Some("Widget"));
    assert_eq!(row.ordered_quantity, 2);
    assert_eq!(row.order_amount, 19.98);
}

#[test]
fn running_twice_with_identical_inputs_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let products = vec![widget(), Product::new("P2", "Gadget", "Tools", "Power")];
    let orders = vec![widget_order()];

    IngestService::new(&mut conn)
        .run_batch(&products, &orders)
        .unwrap();
    let first = snapshot(&conn);

    IngestService::new(&mut conn)
        .run_batch(&products, &orders)
        .unwrap();
    let second = snapshot(&conn);

    assert_eq!(first, second);
}

#[test]
fn rerun_overwrites_mutable_attributes_without_duplicating_rows() {
    let mut conn = open_db_in_memory().unwrap();

    IngestService::new(&mut conn)
        .run_batch(&[widget()], &[widget_order()])
        .unwrap();

    let renamed = Product::new("P1", "Widget MkII", "Tools", "Hand");
    IngestService::new(&mut conn)
        .run_batch(&[renamed], &[widget_order()])
        .unwrap();

    let product_repo = SqliteProductRepository::try_new(&conn).unwrap();
    assert_eq!(product_repo.count_products().unwrap(), 1);
    assert_eq!(
        product_repo.get_product("P1").unwrap().unwrap().name,
        "Widget MkII"
    );

    let merged = fetch_merged_view(&conn).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].product_name.as_deref(), Some("Widget MkII"));
}

#[test]
fn failed_run_rolls_back_to_prior_committed_state() {
    let mut conn = open_db_in_memory().unwrap();

    IngestService::new(&mut conn)
        .run_batch(&[widget()], &[widget_order()])
        .unwrap();

    // Sabotage the schema so the order upsert phase fails mid-transaction.
    conn.execute_batch("ALTER TABLE orders RENAME TO orders_backup;")
        .unwrap();

    let replacement = Product::new("P1", "Should Not Stick", "Tools", "Hand");
    let err = IngestService::new(&mut conn)
        .run_batch(&[replacement], &[widget_order()])
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Repo(RepoError::MissingRequiredTable("orders"))
    ));

    // The product upsert from the failed run must have been rolled back.
    let product_repo = SqliteProductRepository::try_new(&conn).unwrap();
    assert_eq!(
        product_repo.get_product("P1").unwrap().unwrap().name,
        "Widget"
    );
}

#[test]
fn empty_orders_input_aborts_before_any_store_access() {
    let dir = tempfile::tempdir().unwrap();
    let inventory_path = dir.path().join("inventory.csv");
    let orders_path = dir.path().join("orders.csv");
    fs::write(
        &inventory_path,
        "productId,name,category,subCategory\nP1,Widget,Tools,Hand\n",
    )
    .unwrap();
    fs::write(&orders_path, "").unwrap();

    // Callers load both inputs before opening the store; the pipeline run
    // never starts, so no database file is created.
    let products = load_products(&inventory_path).unwrap();
    assert_eq!(products.len(), 1);
    let err = load_orders(&orders_path).unwrap_err();
    assert!(matches!(err, LoadError::EmptyInput(_)));

    let db_path = customer_db_path(dir.path(), "acme").unwrap();
    assert!(!db_path.exists());
}

#[test]
fn pipeline_runs_against_a_durable_customer_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut conn = open_customer_db(dir.path(), "acme").unwrap();
        IngestService::new(&mut conn)
            .run_batch(&[widget()], &[widget_order()])
            .unwrap();
    }

    // Reopen: committed base tables and view survive the connection.
    let conn = open_customer_db(dir.path(), "acme").unwrap();
    let merged = fetch_merged_view(&conn).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].order_id, "O1");
}

type Snapshot = (Vec<Product>, Vec<Order>, Vec<MergedOrder>);

fn snapshot(conn: &rusqlite::Connection) -> Snapshot {
    let product_repo = SqliteProductRepository::try_new(conn).unwrap();
    let order_repo = SqliteOrderRepository::try_new(conn).unwrap();

    let mut products = Vec::new();
    for id in ["P1", "P2"] {
        if let Some(product) = product_repo.get_product(id).unwrap() {
            products.push(product);
        }
    }
    let mut orders = Vec::new();
    if let Some(order) = order_repo.get_order("O1").unwrap() {
        orders.push(order);
    }

    (products, orders, fetch_merged_view(conn).unwrap())
}
