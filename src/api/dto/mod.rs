//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `category` - Category request/response DTOs
//! - `response` - Success envelope
//! - `error` - Common error response DTOs
//! - `health` - Health check DTOs

mod category;
mod error;
mod health;
mod response;

pub use category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use response::ApiResponse;
