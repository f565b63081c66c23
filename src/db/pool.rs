//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Creates an async database connection pool sized from configuration.
///
/// The first connections are opened eagerly, so an unreachable database
/// fails here rather than on the first request.
///
/// # Errors
///
/// `AppError::ConnectionPool` if the initial connections cannot be established.
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::anyhow!("{e}"),
        })
}

/// Applies pending embedded migrations and returns their versions.
///
/// diesel's migration harness is synchronous, so this opens a dedicated
/// blocking connection on the tokio blocking pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, AppError> {
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        use diesel::Connection;
        use diesel::pg::PgConnection;
        use diesel_migrations::MigrationHarness;

        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish connection for migrations".to_string(),
            source: anyhow::Error::new(e),
        })?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run pending migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;

        Ok(applied.iter().map(|version| version.to_string()).collect())
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::new(e),
    })?
}
