use std::time::Duration;

use sea_orm::sea_query::Table;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::entities::{order, order_line, product, product_promotion, promotion, vendor_commission};
use crate::errors::ServiceError;

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

/// Establishes a connection pool to the database
///
/// # Errors
/// Returns a `ServiceError` if the connection cannot be established
pub async fn establish_connection(database_url: &str) -> Result<DbPool, ServiceError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool to the database with custom configuration
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    info!(
        max_connections = config.max_connections,
        "connecting to database"
    );

    let pool = Database::connect(opt).await?;

    info!("database connection pool established");

    Ok(pool)
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Creates the six tables from the entity definitions if they do not exist.
///
/// The store is bulk-loaded and immutable afterwards, so schema management
/// is a startup concern rather than a migration history.
pub async fn init_schema(pool: &DbPool) -> Result<(), ServiceError> {
    debug!("Creating schema from entity definitions");
    let backend = pool.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = [
        schema.create_table_from_entity(product::Entity),
        schema.create_table_from_entity(promotion::Entity),
        schema.create_table_from_entity(product_promotion::Entity),
        schema.create_table_from_entity(vendor_commission::Entity),
        schema.create_table_from_entity(order::Entity),
        schema.create_table_from_entity(order_line::Entity),
    ];

    for stmt in &mut statements {
        pool.execute(backend.build(stmt.if_not_exists())).await?;
    }

    Ok(())
}

/// Drops all six tables and recreates them empty. Used by the seed importer.
pub async fn reset_schema(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Resetting database schema");
    let backend = pool.get_database_backend();

    // Reverse dependency order: referencing tables first.
    let drops = [
        Table::drop().table(order_line::Entity).if_exists().to_owned(),
        Table::drop().table(order::Entity).if_exists().to_owned(),
        Table::drop()
            .table(product_promotion::Entity)
            .if_exists()
            .to_owned(),
        Table::drop()
            .table(vendor_commission::Entity)
            .if_exists()
            .to_owned(),
        Table::drop().table(promotion::Entity).if_exists().to_owned(),
        Table::drop().table(product::Entity).if_exists().to_owned(),
    ];

    for stmt in &drops {
        pool.execute(backend.build(stmt)).await?;
    }

    init_schema(pool).await
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    debug!("Checking database connection");
    pool.ping().await?;
    Ok(())
}

/// Closes the database connection pool
pub async fn close_pool(pool: DbPool) -> Result<(), ServiceError> {
    info!("Closing database connection pool");
    pool.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveValue::Set, EntityTrait};

    async fn memory_pool() -> DbPool {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        establish_connection_with_config(&config)
            .await
            .expect("failed to open in-memory database")
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let pool = memory_pool().await;
        init_schema(&pool).await.expect("first init");
        init_schema(&pool).await.expect("second init");
        assert!(check_connection(&pool).await.is_ok());
    }

    #[tokio::test]
    async fn reset_schema_clears_data() {
        let pool = memory_pool().await;
        init_schema(&pool).await.expect("init");

        product::Entity::insert(product::ActiveModel {
            id: Set(1),
            description: Set("widget".to_string()),
        })
        .exec(&pool)
        .await
        .expect("insert product");

        reset_schema(&pool).await.expect("reset");

        let remaining = product::Entity::find()
            .all(&pool)
            .await
            .expect("query products");
        assert!(remaining.is_empty());
    }
}
