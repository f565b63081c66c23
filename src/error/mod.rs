mod app_error;
mod category_error;
mod constraint_parser;
mod database_converter;

pub use app_error::{AppError, AppResult, ValidationFieldError};
pub use category_error::CategoryError;
pub use constraint_parser::ConstraintParser;
pub use database_converter::DatabaseErrorConverter;
