use thiserror::Error;

use crate::error::AppError;

/// Failures of the category domain rules.
///
/// The display texts are part of the HTTP contract: they are returned to
/// clients as the error detail of a 422 response.
#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("category with this name already exists")]
    AlreadyExists,

    #[error("category with this id doesn't exist")]
    DoesNotExist,

    #[error("category with this id doesn't belong to user")]
    DoesNotBelongToOwner,

    #[error("at least one field for updating category is required")]
    AtLeastOneFieldRequired,

    #[error("category name must be from 3 to 128 symbols long")]
    NameLength,

    #[error("category description must be at most 256 symbols long")]
    DescriptionLength,

    /// Opaque store failure; the source is logged, never shown.
    #[error("category store operation failed")]
    Store(#[source] Box<AppError>),
}

impl CategoryError {
    /// Maps a store error to the domain error it stands for.
    ///
    /// Unique violations mean the name is taken and missing rows mean the
    /// category is gone; anything else stays an opaque store failure.
    pub fn from_store(error: AppError) -> Self {
        match error {
            AppError::Duplicate { .. } => CategoryError::AlreadyExists,
            AppError::NotFound { .. } => CategoryError::DoesNotExist,
            other => CategoryError::Store(Box::new(other)),
        }
    }
}
