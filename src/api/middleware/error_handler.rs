//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as an [`ErrorResponse`] and stashes a copy in the
//! response extensions. [`global_error_handler`] then stamps the request id onto
//! it, and converts any other error response (axum rejections, unmatched
//! routes) into the same JSON shape.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::{AppError, CategoryError};

/// Message used for every binding or validation failure.
pub const INVALID_INPUT_MESSAGE: &str = "invalid input data";

/// Upper bound when reading a plain-text error body for re-rendering.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        log_error(&self, status);

        let body = error_to_body(&self);
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Category { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Category { .. } => "UNPROCESSABLE_CONTENT",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Builds the client-facing body. Storage and internal details never leak.
fn error_to_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound { entity, field, value } => ErrorResponse::new(
            code,
            &format!("{} with {}={} not found", entity, field, value),
        ),
        AppError::Duplicate { entity, field, .. } => ErrorResponse::new(
            code,
            &format!("{} with this {} already exists", entity, field),
        ),
        AppError::BadRequest { message } => {
            ErrorResponse::new(code, INVALID_INPUT_MESSAGE).with_details(json!({ "error": message }))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, INVALID_INPUT_MESSAGE).with_details(json!({ "errors": errors }))
        }
        AppError::Unauthorized { message } => ErrorResponse::new(code, message),
        AppError::Category { message, source } => {
            ErrorResponse::new(code, message).with_details(json!({ "error": source.to_string() }))
        }
        AppError::Database { .. } => ErrorResponse::new(code, "Database operation failed"),
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, &format!("Configuration error: {}", key))
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

fn log_error(error: &AppError, status: StatusCode) {
    match error {
        AppError::Category {
            message,
            source: CategoryError::Store(cause),
        } => {
            tracing::error!(error = ?cause, context = %message, "Category store failure");
        }
        _ if status.is_server_error() => {
            tracing::error!(error = ?error, status = status.as_u16(), "Request failed");
        }
        _ => {
            tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
        }
    }
}

/// Global error handling middleware.
///
/// Must run inside the request id middleware so the id is available.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    // Already rendered from an AppError: only the request id is missing.
    if let Some(body) = response.extensions().get::<ErrorResponse>().cloned() {
        let (parts, _) = response.into_parts();
        return render(parts.status, parts.headers, with_request_id(body, &request_id));
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    let original_message = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    let body = fallback_body(status, original_message);
    render(parts.status, parts.headers, with_request_id(body, &request_id))
}

fn with_request_id(body: ErrorResponse, request_id: &Option<String>) -> ErrorResponse {
    match request_id {
        Some(id) => body.with_request_id(id),
        None => body,
    }
}

fn render(status: StatusCode, mut headers: HeaderMap, body: ErrorResponse) -> Response {
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::CONTENT_TYPE);
    let mut response = (status, headers, Json(body.clone())).into_response();
    response.extensions_mut().insert(body);
    response
}

/// Error body for responses that did not come from an `AppError`.
fn fallback_body(status: StatusCode, original_message: String) -> ErrorResponse {
    let detailed = |code: &str, message: &str| {
        let response = ErrorResponse::new(code, message);
        if original_message.is_empty() {
            response
        } else {
            response.with_details(json!({ "error": original_message }))
        }
    };

    match status {
        // axum's own extractor rejections (path, query, body) land here
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            detailed("BAD_REQUEST", INVALID_INPUT_MESSAGE)
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => detailed("UNSUPPORTED_MEDIA_TYPE", INVALID_INPUT_MESSAGE),
        StatusCode::PAYLOAD_TOO_LARGE => detailed("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::NOT_FOUND => ErrorResponse::new("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ErrorResponse::new("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNAUTHORIZED => detailed("UNAUTHORIZED", "Authentication required"),
        StatusCode::REQUEST_TIMEOUT => ErrorResponse::new("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_server_error() => {
            ErrorResponse::new("INTERNAL_SERVER_ERROR", "An internal server error occurred")
        }
        _ => detailed("UNKNOWN_ERROR", "An unknown error occurred"),
    }
}
