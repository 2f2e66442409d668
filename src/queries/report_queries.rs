use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    db::DbPool,
    entities::{order, order_line, vendor_commission},
    errors::ServiceError,
    reports::DailyOrderSet,
};

/// Trait representing a generic asynchronous read-only query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query using the provided database connection
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError>;
}

/// Fetches the pre-joined row set for one calendar date: the orders placed
/// that day with their lines, plus the vendor commission rates dated exactly
/// that day.
///
/// This is the single store round-trip behind the daily report; all seven
/// metrics derive from the returned set without further queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetDailyOrderSetQuery {
    pub date: NaiveDate,
}

#[async_trait]
impl Query for GetDailyOrderSetQuery {
    type Result = DailyOrderSet;

    #[instrument(skip_all, fields(date = %self.date))]
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError> {
        debug!("Executing GetDailyOrderSetQuery");

        let orders = order::Entity::find()
            .filter(order::Column::CreatedAt.eq(self.date))
            .find_with_related(order_line::Entity)
            .all(db)
            .await?;

        // Rate lookup keyed by vendor for the exact date; orders whose
        // vendor has no row here earn no commission row downstream.
        let commission_rates: HashMap<i32, f64> = vendor_commission::Entity::find()
            .filter(vendor_commission::Column::Date.eq(self.date))
            .all(db)
            .await?
            .into_iter()
            .map(|row| (row.vendor_id, row.rate))
            .collect();

        debug!(
            orders = orders.len(),
            rates = commission_rates.len(),
            "fetched daily order set"
        );

        Ok(DailyOrderSet::new(self.date, orders, commission_rates))
    }
}
