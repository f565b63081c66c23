//! JWT authentication middleware.
//!
//! Provides middleware for validating JWT tokens and extracting the caller's
//! user id.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{validate_access_token, Claims};

/// Extension type for authenticated user information
///
/// This is added to request extensions after successful authentication
/// and can be extracted in handlers using `Extension<AuthUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Owner identity for every category operation
    pub user_id: i64,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
        })
    }
}

/// JWT authentication middleware
///
/// Validates the JWT token from the Authorization header and adds
/// the authenticated user information to request extensions.
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token validation fails or the token has expired
/// - The subject is not a positive user id
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
