//! Category service for business logic operations.
//!
//! Enforces ownership, per-owner name uniqueness and the partial update
//! rules on top of a [`CategoryRepository`].

use std::sync::Arc;

use crate::error::CategoryError;
use crate::models::{Category, CategoryPatch, NewCategory};
use crate::repositories::CategoryRepository;
use crate::services::CategoryRules;

/// Category service handling the list/create/update/delete use cases.
///
/// Holds the repository behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    rules: CategoryRules,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>, rules: CategoryRules) -> Self {
        Self { repo, rules }
    }

    /// Lists the owner's categories, most recently updated first.
    pub async fn list(&self, owner_id: i64) -> Result<Vec<Category>, CategoryError> {
        self.repo
            .list_by_owner(owner_id)
            .await
            .map_err(|e| CategoryError::Store(Box::new(e)))
    }

    /// Creates a category after checking that the owner has no live
    /// category with the same name.
    ///
    /// The lookup is only a fast path; a unique violation raised by the store
    /// on insert is reported the same way.
    pub async fn create(&self, new_category: NewCategory) -> Result<Category, CategoryError> {
        let taken = self
            .repo
            .exists_with_name(new_category.user_id, &new_category.name)
            .await
            .map_err(|e| CategoryError::Store(Box::new(e)))?;
        if taken {
            return Err(CategoryError::AlreadyExists);
        }

        self.repo
            .create(new_category)
            .await
            .map_err(CategoryError::from_store)
    }

    /// Applies a partial update.
    ///
    /// Checks run in this order and all of them finish before anything is
    /// written: existence and ownership, non-empty patch, name length, name
    /// uniqueness, description length. The type is never changed.
    pub async fn update(
        &self,
        category_id: i64,
        owner_id: i64,
        patch: CategoryPatch,
    ) -> Result<Category, CategoryError> {
        let mut category = self
            .repo
            .find_by_id(category_id)
            .await
            .map_err(|e| CategoryError::Store(Box::new(e)))?
            .filter(|c| c.user_id == owner_id)
            .ok_or(CategoryError::DoesNotExist)?;

        if patch.is_empty() {
            return Err(CategoryError::AtLeastOneFieldRequired);
        }

        if let Some(name) = patch.name {
            self.rules.check_name(&name)?;
            if name != category.name {
                let taken = self
                    .repo
                    .exists_with_name(owner_id, &name)
                    .await
                    .map_err(|e| CategoryError::Store(Box::new(e)))?;
                if taken {
                    return Err(CategoryError::AlreadyExists);
                }
            }
            category.name = name;
        }

        if let Some(description) = patch.description {
            self.rules.check_description(&description)?;
            category.description = description;
        }

        self.repo
            .update(category)
            .await
            .map_err(CategoryError::from_store)
    }

    /// Soft-deletes a category owned by `owner_id`.
    pub async fn delete(&self, category_id: i64, owner_id: i64) -> Result<(), CategoryError> {
        let owned = self
            .repo
            .belongs_to_owner(category_id, owner_id)
            .await
            .map_err(|e| CategoryError::Store(Box::new(e)))?;
        if !owned {
            return Err(CategoryError::DoesNotBelongToOwner);
        }

        self.repo
            .soft_delete(category_id)
            .await
            .map_err(|e| CategoryError::Store(Box::new(e)))
    }
}
