use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    errors::ServiceError,
    queries::report_queries::{GetDailyOrderSetQuery, Query},
    reports::DailySalesReport,
};

/// Service producing daily sales-performance reports.
///
/// Stateless between calls: each request is one row-set fetch followed by
/// the single-pass aggregation, with no writes and no cached results.
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Generates the report for one calendar date.
    ///
    /// Returns [`ServiceError::NoDataForDate`] when the date has no
    /// qualifying orders, or when a grouped set backing one of the
    /// mean-based metrics is empty.
    #[instrument(skip_all, fields(date = %date))]
    pub async fn daily_sales_report(
        &self,
        date: NaiveDate,
    ) -> Result<DailySalesReport, ServiceError> {
        let set = GetDailyOrderSetQuery { date }.execute(&self.db).await?;

        if set.is_empty() {
            info!("no orders for requested date");
            return Err(ServiceError::NoDataForDate(date));
        }

        let report = DailySalesReport::from_order_set(&set)?;

        info!(
            orders = set.orders.len(),
            total_items = report.total_items,
            total_customers = report.total_customers,
            "generated daily sales report"
        );

        Ok(report)
    }
}
