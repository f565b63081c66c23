use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Utility for converting database errors to structured AppError variants.
///
/// Unique violations become [`AppError::Duplicate`] so the category service can
/// recognise a lost race on the `(user_id, name)` index.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// `operation` describes what was being attempted and ends up in logs.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(
                    message,
                    info.details(),
                    info.constraint_name(),
                ) {
                    Some((entity, field, value)) => AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                    // still a duplicate, just without the structured key
                    None => AppError::Duplicate {
                        entity: info.table_name().unwrap_or("resource").to_string(),
                        field: "unknown".to_string(),
                        value: "duplicate_value".to_string(),
                    },
                }
            }
            DatabaseErrorKind::CheckViolation => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Check constraint violation: {}", message)),
            },
            DatabaseErrorKind::ClosedConnection => AppError::ConnectionPool {
                source: anyhow::Error::msg(format!("Connection closed: {}", message)),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}
