mod common;

use std::fs;
use std::path::Path;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use eshop_report_api::errors::ServiceError;

use common::{LineSpec, TestApp};

fn seed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()
}

fn write_seed_files(dir: &Path) {
    fs::write(
        dir.join("orders.csv"),
        "id,created_at,vendor_id,customer_id\n\
         1,2021-03-15 09:30:00.000000,1,100\n\
         2,2021-03-15 11:45:12.500000,2,101\n",
    )
    .unwrap();

    fs::write(
        dir.join("order_lines.csv"),
        "order_id,product_id,product_description,product_price,product_vat_rate,discount_rate,quantity,full_price_amount,discounted_amount,vat_amount,total_amount\n\
         1,11,Widget,100.0,0.2,0.1,2,200.0,180.0,36.0,216.0\n\
         2,13,Gadget,100.0,0.2,0.25,3,300.0,225.0,45.0,270.0\n",
    )
    .unwrap();

    fs::write(
        dir.join("products.csv"),
        "id,description\n11,Widget\n13,Gadget\n",
    )
    .unwrap();

    fs::write(dir.join("promotions.csv"), "id,description\n1,Spring sale\n").unwrap();

    fs::write(
        dir.join("product_promotions.csv"),
        "product_id,date,promotion_id\n11,2021-03-15,1\n",
    )
    .unwrap();

    fs::write(
        dir.join("commissions.csv"),
        "vendor_id,date,rate\n1,2021-03-15,0.1\n2,2021-03-15,0.2\n",
    )
    .unwrap();
}

#[tokio::test]
async fn import_then_report_end_to_end() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    write_seed_files(dir.path());

    let summary = app
        .state
        .services
        .importer
        .import_all(dir.path())
        .await
        .expect("import should succeed");

    assert_eq!(summary.orders, 2);
    assert_eq!(summary.order_lines, 2);
    assert_eq!(summary.products, 2);
    assert_eq!(summary.promotions, 1);
    assert_eq!(summary.product_promotions, 1);
    assert_eq!(summary.commissions, 2);

    let report = app
        .state
        .services
        .reports
        .daily_sales_report(seed_date())
        .await
        .expect("report over imported data");

    assert_eq!(report.total_items, 5);
    assert_eq!(report.total_customers, 2);
    assert!((report.total_discount - 95.0).abs() < 1e-9);
    assert!((report.avg_discount_rate - 0.175).abs() < 1e-9);
    assert!((report.avg_order_total - 243.0).abs() < 1e-9);
    // 0.1 * 216 + 0.2 * 270
    assert!((report.total_commissions - 75.6).abs() < 1e-9);
    assert!((report.avg_commissions_per_order - 37.8).abs() < 1e-9);
}

#[tokio::test]
async fn import_resets_previous_store_contents() {
    let app = TestApp::new().await;
    let stale_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    app.seed_order(
        99,
        stale_date,
        1,
        500,
        &[LineSpec {
            product_id: 1,
            quantity: 1,
            discount_rate: 0.0,
            full: 10.0,
            discounted: 10.0,
            vat: 2.0,
        }],
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    write_seed_files(dir.path());
    app.state
        .services
        .importer
        .import_all(dir.path())
        .await
        .expect("import should succeed");

    let err = app
        .state
        .services
        .reports
        .daily_sales_report(stale_date)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NoDataForDate(d) if d == stale_date);
}

#[tokio::test]
async fn missing_seed_file_fails_the_import() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    // No files written at all.

    let err = app
        .state
        .services
        .importer
        .import_all(dir.path())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ImportError(msg) if msg.contains("orders.csv"));
}

#[tokio::test]
async fn malformed_row_fails_the_import() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    write_seed_files(dir.path());
    fs::write(
        dir.path().join("order_lines.csv"),
        "order_id,product_id,product_description,product_price,product_vat_rate,discount_rate,quantity,full_price_amount,discounted_amount,vat_amount,total_amount\n\
         1,11,Widget,100.0,0.2,0.1,three,200.0,180.0,36.0,216.0\n",
    )
    .unwrap();

    let err = app
        .state
        .services
        .importer
        .import_all(dir.path())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ImportError(_));
}

#[tokio::test]
async fn bad_order_timestamp_fails_the_import() {
    let app = TestApp::new().await;
    let dir = tempfile::tempdir().unwrap();
    write_seed_files(dir.path());
    fs::write(
        dir.path().join("orders.csv"),
        "id,created_at,vendor_id,customer_id\n1,15/03/2021,1,100\n",
    )
    .unwrap();

    let err = app
        .state
        .services
        .importer
        .import_all(dir.path())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ImportError(msg) if msg.contains("timestamp"));
}
