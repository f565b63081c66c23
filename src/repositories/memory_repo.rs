//! In-memory category repository used by service and HTTP tests.

use std::sync::Mutex;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use jiff_diesel::ToDiesel;

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::repositories::CategoryRepository;

#[derive(Default)]
struct Store {
    rows: Vec<Category>,
    next_id: i64,
    last_tick: Option<Timestamp>,
}

impl Store {
    /// Wall clock, nudged forward so that consecutive writes never share a timestamp.
    fn tick(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let tick = match self.last_tick {
            Some(last) if now <= last => last + SignedDuration::from_nanos(1),
            _ => now,
        };
        self.last_tick = Some(tick);
        tick
    }

    fn live(&self) -> impl Iterator<Item = &Category> {
        self.rows.iter().filter(|c| c.deleted_at.is_none())
    }

    fn name_taken(&self, owner_id: i64, name: &str, except_id: Option<i64>) -> bool {
        self.live()
            .any(|c| c.user_id == owner_id && c.name == name && Some(c.id) != except_id)
    }
}

fn duplicate(owner_id: i64, name: &str) -> AppError {
    AppError::Duplicate {
        entity: "categories".to_string(),
        field: "user_id, name".to_string(),
        value: format!("{owner_id}, {name}"),
    }
}

fn not_found(category_id: i64) -> AppError {
    AppError::NotFound {
        entity: "category".to_string(),
        field: "id".to_string(),
        value: category_id.to_string(),
    }
}

/// Category store kept in a mutex-guarded vector.
///
/// Enforces the same live-row uniqueness as the database index.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: Mutex<Store>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every row including soft-deleted ones.
    pub fn all_rows(&self) -> Vec<Category> {
        self.lock().rows.clone()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn exists_with_name(&self, owner_id: i64, category_name: &str) -> AppResult<bool> {
        Ok(self.lock().name_taken(owner_id, category_name, None))
    }

    async fn find_by_id(&self, category_id: i64) -> AppResult<Option<Category>> {
        Ok(self.lock().live().find(|c| c.id == category_id).cloned())
    }

    async fn belongs_to_owner(&self, category_id: i64, owner_id: i64) -> AppResult<bool> {
        Ok(self
            .lock()
            .live()
            .any(|c| c.id == category_id && c.user_id == owner_id))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Category>> {
        let store = self.lock();
        let mut owned: Vec<Category> = store
            .live()
            .filter(|c| c.user_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.updated_at
                .to_jiff()
                .cmp(&a.updated_at.to_jiff())
                .then(b.id.cmp(&a.id))
        });
        Ok(owned)
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        let mut store = self.lock();
        if store.name_taken(new_category.user_id, &new_category.name, None) {
            return Err(duplicate(new_category.user_id, &new_category.name));
        }

        store.next_id += 1;
        let stamp = store.tick();
        let category = Category {
            id: store.next_id,
            user_id: new_category.user_id,
            name: new_category.name,
            description: new_category.description,
            category_type: new_category.category_type,
            created_at: stamp.to_diesel(),
            updated_at: stamp.to_diesel(),
            deleted_at: None,
        };
        store.rows.push(category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let mut store = self.lock();
        if store.name_taken(category.user_id, &category.name, Some(category.id)) {
            return Err(duplicate(category.user_id, &category.name));
        }

        let stamp = store.tick().to_diesel();
        let row = store
            .rows
            .iter_mut()
            .find(|c| c.id == category.id && c.deleted_at.is_none())
            .ok_or_else(|| not_found(category.id))?;
        row.name = category.name;
        row.description = category.description;
        row.updated_at = stamp;
        Ok(row.clone())
    }

    async fn soft_delete(&self, category_id: i64) -> AppResult<()> {
        let mut store = self.lock();
        let stamp = store.tick().to_diesel();
        let row = store
            .rows
            .iter_mut()
            .find(|c| c.id == category_id && c.deleted_at.is_none())
            .ok_or_else(|| not_found(category_id))?;
        row.deleted_at = Some(stamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryType;

    fn new_category(owner: i64, name: &str) -> NewCategory {
        NewCategory {
            user_id: owner,
            name: name.to_string(),
            description: String::new(),
            category_type: CategoryType::Expense,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_live_duplicate_but_not_after_delete() {
        let repo = InMemoryCategoryRepository::new();
        let first = repo.create(new_category(1, "Food")).await.unwrap();

        let err = repo.create(new_category(1, "Food")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));

        repo.soft_delete(first.id).await.unwrap();
        let again = repo.create(new_category(1, "Food")).await.unwrap();
        assert_ne!(again.id, first.id);
        assert_eq!(repo.all_rows().len(), 2);
    }

    #[tokio::test]
    async fn test_same_name_for_different_owners() {
        let repo = InMemoryCategoryRepository::new();
        repo.create(new_category(1, "Salary")).await.unwrap();
        repo.create(new_category(2, "Salary")).await.unwrap();

        assert!(repo.exists_with_name(1, "Salary").await.unwrap());
        assert!(!repo.exists_with_name(3, "Salary").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_at_desc() {
        let repo = InMemoryCategoryRepository::new();
        let a = repo.create(new_category(1, "Aaa")).await.unwrap();
        let b = repo.create(new_category(1, "Bbb")).await.unwrap();
        repo.create(new_category(2, "Ccc")).await.unwrap();

        let listed = repo.list_by_owner(1).await.unwrap();
        assert_eq!(
            listed.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![b.id, a.id]
        );

        let mut touched = a.clone();
        touched.description = "weekly".to_string();
        repo.update(touched).await.unwrap();

        let listed = repo.list_by_owner(1).await.unwrap();
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[0].description, "weekly");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row_and_is_not_repeatable() {
        let repo = InMemoryCategoryRepository::new();
        let c = repo.create(new_category(1, "Rent")).await.unwrap();

        repo.soft_delete(c.id).await.unwrap();
        assert!(repo.find_by_id(c.id).await.unwrap().is_none());
        assert!(!repo.belongs_to_owner(c.id, 1).await.unwrap());

        let err = repo.soft_delete(c.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
