//! Category repository for async database operations.
//!
//! Provides the category store operations for the categories table using
//! diesel_async. Soft-deleted rows are invisible to every query here.

use async_trait::async_trait;
use diesel::dsl::{exists, now};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};

/// Persistence operations the category service relies on.
///
/// Implementations report a violated `(user_id, name)` uniqueness as
/// [`AppError::Duplicate`] and a missing row on write as [`AppError::NotFound`].
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Whether the owner has a live category with exactly this name.
    async fn exists_with_name(&self, owner_id: i64, category_name: &str) -> AppResult<bool>;

    async fn find_by_id(&self, category_id: i64) -> AppResult<Option<Category>>;

    /// False when the category is missing, deleted, or owned by someone else.
    async fn belongs_to_owner(&self, category_id: i64, owner_id: i64) -> AppResult<bool>;

    /// Live categories of the owner, most recently updated first.
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Category>>;

    async fn create(&self, new_category: NewCategory) -> AppResult<Category>;

    /// Persists name and description of a fetched category and refreshes `updated_at`.
    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Marks the category deleted.
    async fn soft_delete(&self, category_id: i64) -> AppResult<()>;
}

/// PostgreSQL-backed category repository.
///
/// `AsyncDbPool` is reference counted internally, so cloning is cheap.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: AsyncDbPool,
}

impl PgCategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn exists_with_name(&self, owner_id: i64, category_name: &str) -> AppResult<bool> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(exists(
            categories
                .filter(user_id.eq(owner_id))
                .filter(name.eq(category_name))
                .filter(deleted_at.is_null()),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, category_id: i64) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .filter(id.eq(category_id))
            .filter(deleted_at.is_null())
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn belongs_to_owner(&self, category_id: i64, owner_id: i64) -> AppResult<bool> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::select(exists(
            categories
                .filter(id.eq(category_id))
                .filter(user_id.eq(owner_id))
                .filter(deleted_at.is_null()),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .filter(user_id.eq(owner_id))
            .filter(deleted_at.is_null())
            .order((updated_at.desc(), id.desc()))
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(categories)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(
            categories
                .filter(id.eq(category.id))
                .filter(deleted_at.is_null()),
        )
        .set((
            name.eq(&category.name),
            description.eq(&category.description),
            updated_at.eq(now),
        ))
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    async fn soft_delete(&self, category_id: i64) -> AppResult<()> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(
            categories
                .filter(id.eq(category_id))
                .filter(deleted_at.is_null()),
        )
        .set(deleted_at.eq(now))
        .execute(&mut conn)
        .await?;

        if affected == 0 {
            return Err(AppError::NotFound {
                entity: "category".to_string(),
                field: "id".to_string(),
                value: category_id.to_string(),
            });
        }
        Ok(())
    }
}
