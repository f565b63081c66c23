//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{middleware, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. CORS and compression
/// 2. Request ID - generates/propagates request IDs
/// 3. Global error handler - renders every error as JSON with the request ID
/// 4. Logging - one span per request
/// 5. JWT authentication, on the category routes only
///
/// # Routes
/// - `/users/{user_id}/categories[/{category_id}]` - Category CRUD (bearer token)
/// - `/health`, `/health/ready`, `/health/live` - Health checks
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState) -> Router {
    let category_routes = handlers::categories::category_routes().layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(category_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        // last added runs first
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
