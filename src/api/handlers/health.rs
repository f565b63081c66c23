//! Health check endpoint handlers.
//!
//! Health checks go straight to the connection pool rather than through the
//! service layer.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Full report
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Reports the service status with a database round trip.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);

    let status = HealthStatus::overall(checks.values());
    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: Timestamp::now().to_string(),
        checks,
    };

    (status_code_for(status), Json(response))
}

/// Readiness probe: 200 only when the database answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_database(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe. Touches no dependencies.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn status_code_for(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let elapsed_ms = |start: Instant| Some(start.elapsed().as_millis() as u64);

    let mut conn = match state.db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            return ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(format!("Connection failed: {}", e)),
                response_time_ms: elapsed_ms(start),
            };
        }
    };

    match diesel::sql_query("SELECT 1").execute(&mut conn).await {
        Ok(_) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Connected".to_string()),
            response_time_ms: elapsed_ms(start),
        },
        Err(e) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Query failed: {}", e)),
            response_time_ms: elapsed_ms(start),
        },
    }
}
