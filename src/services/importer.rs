use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveValue::Set, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    db::{self, DbPool},
    entities::{order, order_line, product, product_promotion, promotion, vendor_commission},
    errors::ServiceError,
};

/// Rows inserted per statement; keeps each insert under SQLite's
/// bind-variable limit.
const INSERT_BATCH: usize = 500;

#[derive(Debug, Deserialize)]
struct OrderRow {
    id: i32,
    created_at: String,
    vendor_id: i32,
    customer_id: i32,
}

#[derive(Debug, Deserialize)]
struct OrderLineRow {
    order_id: i32,
    product_id: i32,
    product_description: String,
    product_price: f64,
    product_vat_rate: f64,
    discount_rate: f64,
    quantity: i32,
    full_price_amount: f64,
    discounted_amount: f64,
    vat_amount: f64,
    total_amount: f64,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: i32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct PromotionRow {
    id: i32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProductPromotionRow {
    product_id: i32,
    date: String,
    promotion_id: i32,
}

#[derive(Debug, Deserialize)]
struct CommissionRow {
    vendor_id: i32,
    date: String,
    rate: f64,
}

/// Row counts loaded per table.
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub orders: usize,
    pub order_lines: usize,
    pub products: usize,
    pub promotions: usize,
    pub product_promotions: usize,
    pub commissions: usize,
}

/// Bulk-loads the six seed CSV files into the store.
///
/// A seed/reset facility: the whole schema is dropped and recreated before
/// loading, and a missing file or malformed row fails the import (the store
/// may then be partially loaded; rerun the import to recover).
pub struct ImportService {
    db: Arc<DbPool>,
}

impl ImportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Resets the schema and loads every seed file from `data_dir`.
    #[instrument(skip_all, fields(data_dir = %data_dir.display()))]
    pub async fn import_all(&self, data_dir: &Path) -> Result<ImportSummary, ServiceError> {
        db::reset_schema(&self.db).await?;

        let summary = ImportSummary {
            orders: self.import_orders(&data_dir.join("orders.csv")).await?,
            order_lines: self
                .import_order_lines(&data_dir.join("order_lines.csv"))
                .await?,
            products: self.import_products(&data_dir.join("products.csv")).await?,
            promotions: self
                .import_promotions(&data_dir.join("promotions.csv"))
                .await?,
            product_promotions: self
                .import_product_promotions(&data_dir.join("product_promotions.csv"))
                .await?,
            commissions: self
                .import_commissions(&data_dir.join("commissions.csv"))
                .await?,
        };

        info!(
            orders = summary.orders,
            order_lines = summary.order_lines,
            products = summary.products,
            promotions = summary.promotions,
            product_promotions = summary.product_promotions,
            commissions = summary.commissions,
            "seed data import complete"
        );

        Ok(summary)
    }

    async fn import_orders(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<OrderRow> = read_rows(path)?;
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(order::ActiveModel {
                id: Set(row.id),
                created_at: Set(parse_order_date(&row.created_at)?),
                vendor_id: Set(row.vendor_id),
                customer_id: Set(row.customer_id),
            });
        }
        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            order::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }

    async fn import_order_lines(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<OrderLineRow> = read_rows(path)?;
        let models: Vec<order_line::ActiveModel> = rows
            .into_iter()
            .map(|row| order_line::ActiveModel {
                order_id: Set(row.order_id),
                product_id: Set(row.product_id),
                product_description: Set(row.product_description),
                product_price: Set(row.product_price),
                product_vat_rate: Set(row.product_vat_rate),
                discount_rate: Set(row.discount_rate),
                quantity: Set(row.quantity),
                full_price_amount: Set(row.full_price_amount),
                discounted_amount: Set(row.discounted_amount),
                vat_amount: Set(row.vat_amount),
                total_amount: Set(row.total_amount),
                ..Default::default()
            })
            .collect();

        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            order_line::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }

    async fn import_products(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<ProductRow> = read_rows(path)?;
        let models: Vec<product::ActiveModel> = rows
            .into_iter()
            .map(|row| product::ActiveModel {
                id: Set(row.id),
                description: Set(row.description),
            })
            .collect();

        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            product::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }

    async fn import_promotions(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<PromotionRow> = read_rows(path)?;
        let models: Vec<promotion::ActiveModel> = rows
            .into_iter()
            .map(|row| promotion::ActiveModel {
                id: Set(row.id),
                description: Set(row.description),
            })
            .collect();

        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            promotion::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }

    async fn import_product_promotions(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<ProductPromotionRow> = read_rows(path)?;
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(product_promotion::ActiveModel {
                product_id: Set(row.product_id),
                date: Set(parse_date(&row.date)?),
                promotion_id: Set(row.promotion_id),
                ..Default::default()
            });
        }

        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            product_promotion::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }

    async fn import_commissions(&self, path: &Path) -> Result<usize, ServiceError> {
        let rows: Vec<CommissionRow> = read_rows(path)?;
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(vendor_commission::ActiveModel {
                vendor_id: Set(row.vendor_id),
                date: Set(parse_date(&row.date)?),
                rate: Set(row.rate),
                ..Default::default()
            });
        }

        let count = models.len();
        for chunk in models.chunks(INSERT_BATCH) {
            vendor_commission::Entity::insert_many(chunk.to_vec())
                .exec(&*self.db)
                .await?;
        }
        Ok(count)
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, ServiceError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ServiceError::ImportError(format!("{}: {}", path.display(), e)))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ServiceError::ImportError(format!("{}: {}", path.display(), e)))
}

/// Order timestamps carry a time component in the dumps; only the calendar
/// date is kept.
fn parse_order_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ts| ts.date())
        .map_err(|e| ServiceError::ImportError(format!("bad order timestamp '{raw}': {e}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ServiceError::ImportError(format!("bad date '{raw}': {e}")))
}
