//! eShop Report API Library
//!
//! This crate computes daily sales-performance statistics for an e-commerce
//! vendor network: a date-scoped aggregation engine over orders, order
//! lines, and vendor commission rates, plus the storage, import, and HTTP
//! plumbing around it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod openapi;
pub mod queries;
pub mod reports;
pub mod services;

use std::sync::Arc;

use crate::db::DbPool;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Versioned API surface: everything under `/api/v1`.
pub fn api_v1_routes() -> axum::Router<AppState> {
    axum::Router::new().nest("/reports", handlers::reports::report_routes())
}
