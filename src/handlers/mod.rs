pub mod common;
pub mod health;
pub mod reports;

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::{importer::ImportService, reports::ReportService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub reports: Arc<ReportService>,
    pub importer: Arc<ImportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            reports: Arc::new(ReportService::new(db_pool.clone())),
            importer: Arc::new(ImportService::new(db_pool)),
        }
    }
}
