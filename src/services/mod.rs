//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod category_rules;
mod category_service;

pub use category_rules::CategoryRules;
pub use category_service::CategoryService;

use std::sync::Arc;

use crate::db::AsyncDbPool;
use crate::repositories::{CategoryRepository, PgCategoryRepository};

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
}

impl Services {
    /// Wires services to the PostgreSQL repositories.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self::with_category_repository(Arc::new(PgCategoryRepository::new(pool)))
    }

    /// Wires services to an arbitrary category store.
    pub fn with_category_repository(repo: Arc<dyn CategoryRepository>) -> Self {
        Self {
            categories: CategoryService::new(repo, CategoryRules::default()),
        }
    }
}
