//! Category request handlers.
//!
//! Every route is scoped under `/users/{user_id}/categories` and requires a
//! bearer token. The owner is always taken from the token; the `user_id`
//! path segment only selects the route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::CATEGORY_TAG;
use crate::api::dto::{
    ApiResponse, CategoryResponse, CreateCategoryRequest, ErrorResponse, UpdateCategoryRequest,
};
use crate::api::middleware::{AuthUser, RequestId};
use crate::error::{AppError, AppResult};
use crate::models::CategoryPatch;
use crate::state::AppState;
use crate::utils::{ValidatedJson, ValidatedPatch};

const CANNOT_RETRIEVE: &str = "cannot retrieve categories";
const CANNOT_CREATE: &str = "cannot create category";
const CANNOT_UPDATE: &str = "cannot update category";
const CANNOT_DELETE: &str = "cannot delete category";

/// Creates category routes.
///
/// Routes:
/// - GET    /users/{user_id}/categories                - List categories
/// - POST   /users/{user_id}/categories                - Create category
/// - PATCH  /users/{user_id}/categories/{category_id}  - Update category
/// - DELETE /users/{user_id}/categories/{category_id}  - Delete category
pub fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories, create_category))
        .routes(routes!(update_category, delete_category))
}

/// GET /users/{user_id}/categories - List the caller's categories
///
/// Most recently updated first.
#[utoipa::path(
    get,
    path = "/users/{user_id}/categories",
    tag = CATEGORY_TAG,
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Categories could not be retrieved", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_categories(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Path(_user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<CategoryResponse>>>> {
    let categories = state
        .services
        .categories
        .list(auth_user.user_id)
        .await
        .map_err(|e| AppError::category(CANNOT_RETRIEVE, e))?;

    info!(
        action = "GetCategories",
        user_id = auth_user.user_id,
        count = categories.len(),
        request_id = %request_id,
        "Categories retrieved"
    );

    let data = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ApiResponse::new("Categories retrieved", data, &request_id.0)))
}

/// POST /users/{user_id}/categories - Create category
///
/// Returns 201 Created with the stored category.
#[utoipa::path(
    post,
    path = "/users/{user_id}/categories",
    tag = CATEGORY_TAG,
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Category could not be created", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Path(_user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CategoryResponse>>)> {
    let category = state
        .services
        .categories
        .create(payload.into_new_category(auth_user.user_id))
        .await
        .map_err(|e| AppError::category(CANNOT_CREATE, e))?;

    info!(
        action = "CreateCategory",
        user_id = auth_user.user_id,
        category_id = category.id,
        request_id = %request_id,
        "Category created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Category created",
            CategoryResponse::from(category),
            &request_id.0,
        )),
    ))
}

/// PATCH /users/{user_id}/categories/{category_id} - Update category
///
/// Only the fields present in the body are changed; the type never is. A
/// request without a body is an empty patch.
#[utoipa::path(
    patch,
    path = "/users/{user_id}/categories/{category_id}",
    tag = CATEGORY_TAG,
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Category could not be updated", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Path((_user_id, category_id)): Path<(i64, i64)>,
    ValidatedPatch(payload): ValidatedPatch<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryResponse>>> {
    let category = state
        .services
        .categories
        .update(category_id, auth_user.user_id, CategoryPatch::from(payload))
        .await
        .map_err(|e| AppError::category(CANNOT_UPDATE, e))?;

    info!(
        action = "UpdateCategory",
        user_id = auth_user.user_id,
        category_id = category.id,
        request_id = %request_id,
        "Category updated"
    );

    Ok(Json(ApiResponse::new(
        "Category updated",
        CategoryResponse::from(category),
        &request_id.0,
    )))
}

/// DELETE /users/{user_id}/categories/{category_id} - Delete category
///
/// Soft delete; responds 204 with no body.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/categories/{category_id}",
    tag = CATEGORY_TAG,
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("category_id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Category could not be deleted", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Path((_user_id, category_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .services
        .categories
        .delete(category_id, auth_user.user_id)
        .await
        .map_err(|e| AppError::category(CANNOT_DELETE, e))?;

    info!(
        action = "DeleteCategory",
        user_id = auth_user.user_id,
        category_id,
        request_id = %request_id,
        "Category deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
