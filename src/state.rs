//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used directly by health checks
    pub db_pool: AsyncDbPool,
    /// Secret used to verify bearer tokens
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Creates a new AppState backed by PostgreSQL.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, settings.jwt.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig) -> Self {
        Self {
            services: Services::new(pool.clone()),
            db_pool: pool,
            jwt_config,
        }
    }

    /// State over the in-memory store. The pool is lazy and points nowhere,
    /// so only health checks ever touch it.
    #[cfg(test)]
    pub fn for_tests(
        repo: std::sync::Arc<crate::repositories::InMemoryCategoryRepository>,
        jwt_config: JwtConfig,
    ) -> Self {
        use diesel_async::AsyncPgConnection;
        use diesel_async::pooled_connection::AsyncDieselConnectionManager;
        use diesel_async::pooled_connection::bb8::Pool;

        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
            "postgres://unused@127.0.0.1:1/unused",
        );
        let pool = Pool::builder()
            .connection_timeout(std::time::Duration::from_millis(200))
            .build_unchecked(manager);

        Self {
            services: Services::with_category_repository(repo),
            db_pool: pool,
            jwt_config,
        }
    }
}
