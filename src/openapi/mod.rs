use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{errors::ErrorResponse, handlers, reports::DailySalesReport};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "eShop Report API",
        description = "Daily sales-performance reports over e-commerce order data: \
                       items sold, customer counts, discount totals, order averages, \
                       and vendor commissions for a requested calendar date."
    ),
    paths(
        handlers::reports::daily_report,
        handlers::reports::daily_report_text,
        handlers::health::health,
    ),
    components(schemas(
        DailySalesReport,
        ErrorResponse,
        handlers::health::HealthInfo,
        handlers::health::HealthStatus,
    )),
    tags(
        (name = "Reports", description = "Daily sales report endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/swagger-ui`, serving the generated document at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
