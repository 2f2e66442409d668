//! Daily sales report: the date-scoped row set and the metric computations
//! over it.
//!
//! The query layer materializes one [`DailyOrderSet`] per requested date
//! (orders joined with their lines, plus the vendor commission rates dated
//! that day). Every metric derives from that one row set; the composed
//! report is produced in a single pass so all seven values reflect the same
//! snapshot.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entities::{order, order_line},
    errors::ServiceError,
};

/// The filtered, joined row set for one calendar date.
///
/// `commission_rates` holds only the rates dated exactly on `date`; an order
/// whose vendor is absent from the map earns no commission row (exact-date
/// join, no "as of" fallback).
#[derive(Debug, Clone)]
pub struct DailyOrderSet {
    pub date: NaiveDate,
    pub orders: Vec<(order::Model, Vec<order_line::Model>)>,
    pub commission_rates: HashMap<i32, f64>,
}

impl DailyOrderSet {
    pub fn new(
        date: NaiveDate,
        orders: Vec<(order::Model, Vec<order_line::Model>)>,
        commission_rates: HashMap<i32, f64>,
    ) -> Self {
        Self {
            date,
            orders,
            commission_rates,
        }
    }

    /// True when the date has no qualifying orders at all.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Accumulators filled by one pass over a [`DailyOrderSet`].
///
/// The per-order vectors carry the group results for the two-level metrics:
/// first grouped by order, then averaged across orders.
#[derive(Debug, Default)]
struct Scan {
    line_count: u64,
    item_count: i64,
    customers: HashSet<i32>,
    discount_total: f64,
    discount_rate_sum: f64,
    order_totals: Vec<f64>,
    order_commissions: Vec<f64>,
}

impl Scan {
    fn run(set: &DailyOrderSet) -> Self {
        let mut scan = Scan::default();
        for (order, lines) in &set.orders {
            scan.customers.insert(order.customer_id);
            let mut order_total = 0.0;
            for line in lines {
                scan.line_count += 1;
                scan.item_count += i64::from(line.quantity);
                scan.discount_total += line.full_price_amount - line.discounted_amount;
                scan.discount_rate_sum += line.discount_rate;
                order_total += line.total_amount;
            }
            scan.order_totals.push(order_total);
            if let Some(rate) = set.commission_rates.get(&order.vendor_id) {
                scan.order_commissions.push(rate * order_total);
            }
        }
        scan
    }

    fn avg_discount_rate(&self, date: NaiveDate) -> Result<f64, ServiceError> {
        if self.line_count == 0 {
            return Err(ServiceError::NoDataForDate(date));
        }
        Ok(self.discount_rate_sum / self.line_count as f64)
    }

    fn avg_order_total(&self, date: NaiveDate) -> Result<f64, ServiceError> {
        if self.order_totals.is_empty() {
            return Err(ServiceError::NoDataForDate(date));
        }
        Ok(self.order_totals.iter().sum::<f64>() / self.order_totals.len() as f64)
    }

    fn total_commissions(&self) -> f64 {
        self.order_commissions.iter().sum()
    }

    fn avg_commissions_per_order(&self, date: NaiveDate) -> Result<f64, ServiceError> {
        if self.order_commissions.is_empty() {
            return Err(ServiceError::NoDataForDate(date));
        }
        Ok(self.total_commissions() / self.order_commissions.len() as f64)
    }
}

/// Total quantity over all order lines on the date. Defined 0 on an empty
/// set, unlike the mean-based metrics.
pub fn total_items(set: &DailyOrderSet) -> i64 {
    Scan::run(set).item_count
}

/// Count of distinct customers among the date's orders. Defined 0 on an
/// empty set.
pub fn total_customers(set: &DailyOrderSet) -> i64 {
    Scan::run(set).customers.len() as i64
}

/// Total discount given: Σ (full-price amount − discounted amount) over the
/// date's order lines. Defined 0 on an empty set.
pub fn total_discount(set: &DailyOrderSet) -> f64 {
    Scan::run(set).discount_total
}

/// Mean discount rate over the date's order lines. Undefined (no-data error)
/// when the joined line set is empty.
pub fn avg_discount_rate(set: &DailyOrderSet) -> Result<f64, ServiceError> {
    Scan::run(set).avg_discount_rate(set.date)
}

/// Mean, across the date's orders, of each order's summed line totals.
/// Undefined (no-data error) when the date has no orders.
pub fn avg_order_total(set: &DailyOrderSet) -> Result<f64, ServiceError> {
    Scan::run(set).avg_order_total(set.date)
}

/// Σ over commissioned orders of rate × order total. Orders whose vendor has
/// no rate dated on the report date are excluded. Vacuous sum: defined 0
/// when no order has a matching rate.
pub fn total_commissions(set: &DailyOrderSet) -> f64 {
    Scan::run(set).total_commissions()
}

/// Mean per-order commission over the commissioned orders only; excluded
/// orders contribute to neither the sum nor the denominator. Undefined
/// (no-data error) when no order has a matching rate.
pub fn avg_commissions_per_order(set: &DailyOrderSet) -> Result<f64, ServiceError> {
    Scan::run(set).avg_commissions_per_order(set.date)
}

/// The flat daily report: echoed input date plus the seven metrics.
///
/// A pure value: computing it twice over the same store contents yields
/// bit-identical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailySalesReport {
    pub date: NaiveDate,
    pub total_items: i64,
    pub total_customers: i64,
    pub total_discount: f64,
    pub avg_discount_rate: f64,
    pub avg_order_total: f64,
    pub total_commissions: f64,
    pub avg_commissions_per_order: f64,
}

impl DailySalesReport {
    /// Derives all seven metrics from the row set in a single pass.
    ///
    /// Errors with [`ServiceError::NoDataForDate`] when the date has no
    /// orders, no order lines, or no commissioned order (the mean-based
    /// metrics are undefined over an empty group).
    pub fn from_order_set(set: &DailyOrderSet) -> Result<Self, ServiceError> {
        if set.is_empty() {
            return Err(ServiceError::NoDataForDate(set.date));
        }

        let scan = Scan::run(set);
        Ok(Self {
            date: set.date,
            total_items: scan.item_count,
            total_customers: scan.customers.len() as i64,
            total_discount: scan.discount_total,
            avg_discount_rate: scan.avg_discount_rate(set.date)?,
            avg_order_total: scan.avg_order_total(set.date)?,
            total_commissions: scan.total_commissions(),
            avg_commissions_per_order: scan.avg_commissions_per_order(set.date)?,
        })
    }
}

impl fmt::Display for DailySalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "eShop Report for {}", self.date)?;
        writeln!(
            f,
            "Total Number of Items Sold: {}",
            format_count(self.total_items)
        )?;
        writeln!(
            f,
            "Total Number of Customers: {}",
            format_count(self.total_customers)
        )?;
        writeln!(
            f,
            "Total Discount Given: {}",
            format_currency(self.total_discount)
        )?;
        writeln!(
            f,
            "Average Discount Rate: {}",
            format_percent(self.avg_discount_rate)
        )?;
        writeln!(
            f,
            "Average Order Total: {}",
            format_currency(self.avg_order_total)
        )?;
        writeln!(
            f,
            "Total Commissions: {}",
            format_currency(self.total_commissions)
        )?;
        write!(
            f,
            "Average Commissions per Order: {}",
            format_currency(self.avg_commissions_per_order)
        )
    }
}

fn group_digits(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(*b));
    }
    out
}

/// Formats an integer count with thousands separators: 3082 -> "3,082".
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let sign = if n < 0 { "-" } else { "" };
    format!("{sign}{}", group_digits(&digits))
}

/// Formats a monetary amount: two decimals, thousands separators, pound
/// sign. 20061245.636 -> "£20,061,245.64".
pub fn format_currency(amount: f64) -> String {
    let rounded = format!("{amount:.2}");
    let (sign, rest) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    match rest.split_once('.') {
        Some((int_part, frac)) => format!("{sign}£{}.{frac}", group_digits(int_part)),
        None => format!("{sign}£{}", group_digits(rest)),
    }
}

/// Formats a fractional rate as a percentage: 0.1295 -> "12.95%".
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
