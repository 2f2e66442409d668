use super::common::{map_service_error, success_response, validate_input};
use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    reports::DailySalesReport,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query parameters for the daily report endpoints.
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct DailyReportParams {
    /// Report date, `YYYY-MM-DD`
    #[validate(length(min = 1, message = "date must not be empty"))]
    pub date: String,
}

impl DailyReportParams {
    /// Parses the date string; invalid input never reaches the service.
    fn to_date(&self) -> Result<NaiveDate, ApiError> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| ApiError::BadRequest(format!("Invalid date '{}': {}", self.date, e)))
    }
}

/// Daily sales report as JSON.
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily",
    params(DailyReportParams),
    responses(
        (status = 200, description = "Daily sales report", body = DailySalesReport),
        (status = 400, description = "Missing or invalid date", body = ErrorResponse),
        (status = 404, description = "No data for this date", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    ),
    tag = "Reports"
)]
pub async fn daily_report(
    State(state): State<AppState>,
    Query(params): Query<DailyReportParams>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&params)?;
    let date = params.to_date()?;

    let report = state
        .services
        .reports
        .daily_sales_report(date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Daily sales report as human-readable text, with thousands separators and
/// percentage display.
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily/text",
    params(DailyReportParams),
    responses(
        (status = 200, description = "Plain-text report rendering", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or invalid date", body = ErrorResponse),
        (status = 404, description = "No data for this date", body = ErrorResponse),
    ),
    tag = "Reports"
)]
pub async fn daily_report_text(
    State(state): State<AppState>,
    Query(params): Query<DailyReportParams>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&params)?;
    let date = params.to_date()?;

    let report = state
        .services
        .reports
        .daily_sales_report(date)
        .await
        .map_err(map_service_error)?;

    Ok((StatusCode::OK, report.to_string()))
}

/// Creates the router for report endpoints
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily_report))
        .route("/daily/text", get(daily_report_text))
}
