use axum::body::Body;
use axum::extract::{rejection::JsonRejection, FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body extractor that runs `validator` rules after deserialization.
///
/// Both failures reject with an [`AppError`]: malformed bodies become
/// `BadRequest`, failed rules become `ValidationErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Largest patch body read before it is handed to the JSON extractor.
const MAX_PATCH_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Like [`ValidatedJson`], but an empty body binds to `T::default()`.
///
/// Used for partial updates, where a request without a body is an empty patch
/// and is left to the service to reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPatch<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedPatch<T>
where
    T: DeserializeOwned + Validate + Default,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_PATCH_BODY_BYTES)
            .await
            .map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ValidatedPatch(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let ValidatedJson(value) = ValidatedJson::<T>::from_request(req, state).await?;
        Ok(ValidatedPatch(value))
    }
}
