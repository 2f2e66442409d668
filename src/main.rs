use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use eshop_report_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    api::db::init_schema(&db_pool).await?;

    // Build services
    let db_arc = Arc::new(db_pool);
    let services = api::handlers::AppServices::new(db_arc.clone());

    // Optional seed import: resets the store and reloads the CSV dumps
    if cfg.auto_import {
        let summary = services
            .importer
            .import_all(Path::new(&cfg.data_dir))
            .await
            .map_err(|e| {
                error!("Seed data import failed: {}", e);
                e
            })?;
        info!(
            orders = summary.orders,
            order_lines = summary.order_lines,
            commissions = summary.commissions,
            "seed data imported"
        );
    }

    // Compose shared app state
    let app_state = api::AppState {
        db: db_arc.clone(),
        config: cfg.clone(),
        services,
    };

    // Build CORS layer from config
    let cors_layer = match cfg.cors_allowed_origins.as_deref() {
        Some(raw) => {
            let origins: Vec<HeaderValue> = raw
                .split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => {
            info!("No CORS origins configured; using permissive CORS");
            CorsLayer::permissive()
        }
    };

    // Build router: banner + health + v1 API + Swagger UI
    let app = Router::<api::AppState>::new()
        .route("/", get(|| async { "eshop-report-api up" }))
        .nest("/api/v1", api::api_v1_routes())
        .merge(api::handlers::health::health_routes())
        .merge(api::openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            api::middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(app_state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!("eshop-report-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Teardown: close the pool if we hold the last reference
    match Arc::try_unwrap(db_arc) {
        Ok(pool) => api::db::close_pool(pool).await?,
        Err(_) => warn!("database pool still shared at shutdown; skipping explicit close"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
