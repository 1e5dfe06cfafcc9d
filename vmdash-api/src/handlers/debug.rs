// Datastore diagnostics
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::app::AppState;
use crate::repository::RepoError;
use crate::version;

fn env_summary(configured: bool) -> serde_json::Value {
    json!({ "DATABASE_URL": if configured { "configured" } else { "missing" } })
}

#[utoipa::path(
    get,
    path = "/debug",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Datastore reachable"),
        (status = 500, description = "Datastore connection failed"),
        (status = 503, description = "DATABASE_URL not set")
    )
)]
pub async fn debug_datastore(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.database_configured {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "DATABASE_URL environment variable is not set",
                "env": env_summary(false),
            })),
        );
    }

    match state.vms.info().await {
        Ok(info) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "Database connection successful",
                "database": {
                    "connected": true,
                    "currentTime": info.current_time,
                    "version": info.version,
                    "vmsTableExists": info.vms_table_exists,
                    "vmCount": info.vm_count,
                },
                "backendVersion": version::get_backend_version(),
                "env": env_summary(true),
            })),
        ),
        Err(RepoError::NotConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "DATABASE_URL environment variable is not set",
                "env": env_summary(false),
            })),
        ),
        Err(e) => {
            tracing::error!("Database debug error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Database connection failed",
                    "error": e.to_string(),
                    "env": env_summary(true),
                })),
            )
        }
    }
}
