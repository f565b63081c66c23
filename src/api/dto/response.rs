//! Success envelope shared by the category endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// `{message, data, requestId}` wrapper around a successful result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &str, data: T, request_id: &str) -> Self {
        Self {
            message: message.to_string(),
            data,
            request_id: request_id.to_string(),
        }
    }
}
