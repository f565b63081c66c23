//! Repository layer for data access operations.

mod category_repo;
#[cfg(test)]
mod memory_repo;

pub use category_repo::{CategoryRepository, PgCategoryRepository};
#[cfg(test)]
pub use memory_repo::InMemoryCategoryRepository;
