use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::Request,
    response::Response,
    Router,
};
use chrono::NaiveDate;
use sea_orm::{ActiveValue::Set, EntityTrait};
use serde_json::Value;
use tower::ServiceExt;

use eshop_report_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{order, order_line, vendor_commission},
    handlers::AppServices,
    AppState,
};

/// Harness spinning up an application backed by an in-memory SQLite store.
///
/// The pool is pinned to a single connection so every query sees the same
/// in-memory database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");
        db::init_schema(&pool).await.expect("failed to create schema");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());
        let state = AppState {
            db: db_arc,
            config: AppConfig::new("sqlite::memory:", "127.0.0.1", 18_080, "test"),
            services,
        };

        let router = Router::new()
            .nest("/api/v1", eshop_report_api::api_v1_routes())
            .merge(eshop_report_api::handlers::health::health_routes())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Issues a GET against the in-process router.
    #[allow(dead_code)]
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("request failed")
    }

    /// Inserts one order with its lines.
    #[allow(dead_code)]
    pub async fn seed_order(
        &self,
        id: i32,
        date: NaiveDate,
        vendor_id: i32,
        customer_id: i32,
        lines: &[LineSpec],
    ) {
        order::Entity::insert(order::ActiveModel {
            id: Set(id),
            created_at: Set(date),
            vendor_id: Set(vendor_id),
            customer_id: Set(customer_id),
        })
        .exec(&*self.state.db)
        .await
        .expect("insert order");

        for line in lines {
            order_line::Entity::insert(order_line::ActiveModel {
                order_id: Set(id),
                product_id: Set(line.product_id),
                product_description: Set("seeded product".to_string()),
                product_price: Set(line.full / f64::from(line.quantity.max(1))),
                product_vat_rate: Set(0.2),
                discount_rate: Set(line.discount_rate),
                quantity: Set(line.quantity),
                full_price_amount: Set(line.full),
                discounted_amount: Set(line.discounted),
                vat_amount: Set(line.vat),
                total_amount: Set(line.discounted + line.vat),
                ..Default::default()
            })
            .exec(&*self.state.db)
            .await
            .expect("insert order line");
        }
    }

    /// Inserts a vendor commission rate for one date.
    #[allow(dead_code)]
    pub async fn seed_commission(&self, vendor_id: i32, date: NaiveDate, rate: f64) {
        vendor_commission::Entity::insert(vendor_commission::ActiveModel {
            vendor_id: Set(vendor_id),
            date: Set(date),
            rate: Set(rate),
            ..Default::default()
        })
        .exec(&*self.state.db)
        .await
        .expect("insert commission");
    }
}

/// One order line to seed, amounts given explicitly (the store trusts them).
#[allow(dead_code)]
pub struct LineSpec {
    pub product_id: i32,
    pub quantity: i32,
    pub discount_rate: f64,
    pub full: f64,
    pub discounted: f64,
    pub vat: f64,
}

/// Reads a response body as JSON.
#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

/// Reads a response body as text.
#[allow(dead_code)]
pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 response body")
}
