//! Error response DTOs.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Standard error response format.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "code": "UNPROCESSABLE_CONTENT",
    "message": "cannot create category",
    "details": { "error": "category with this name already exists" },
    "requestId": "6f1c2a0e-3f1b-4c55-9d3e-0a7b1f4f8e21"
}))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(ErrorResponse::new("UNAUTHORIZED", "Invalid token")).unwrap();
        assert_eq!(json, json!({"code": "UNAUTHORIZED", "message": "Invalid token"}));
    }

    #[test]
    fn test_request_id_serializes_camel_case() {
        let json = serde_json::to_value(
            ErrorResponse::new("BAD_REQUEST", "invalid input data")
                .with_details(json!({"error": "missing field `name`"}))
                .with_request_id("req-1"),
        )
        .unwrap();
        assert_eq!(json["requestId"], "req-1");
        assert_eq!(json["details"]["error"], "missing field `name`");
    }
}
