// VM collection handlers
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use vmdash_common::{CreateVmRequest, DeleteVmResponse, UpdateVmRequest, Vm};

use crate::app::AppState;
use crate::error::ApiError;

#[utoipa::path(
    get,
    path = "/vms",
    tag = "VMs",
    responses(
        (status = 200, description = "All VMs, newest first", body = Vec<Vm>),
        (status = 500, description = "Datastore error", body = vmdash_common::ErrorBody),
        (status = 503, description = "Database not configured", body = vmdash_common::ErrorBody)
    )
)]
pub async fn list_vms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Vm>>, ApiError> {
    let vms = state
        .vms
        .list()
        .await
        .map_err(|e| ApiError::from_repo("Failed to fetch VMs", e))?;
    tracing::debug!("Fetched VMs: {}", vms.len());
    Ok(Json(vms))
}

#[utoipa::path(
    post,
    path = "/vms",
    tag = "VMs",
    request_body = CreateVmRequest,
    responses(
        (status = 201, description = "Created", body = Vm),
        (status = 400, description = "Missing required fields", body = vmdash_common::ErrorBody),
        (status = 500, description = "Datastore error", body = vmdash_common::ErrorBody)
    )
)]
pub async fn create_vm(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVmRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let new_vm = payload
        .validate()
        .map_err(|missing| ApiError::missing_fields(&missing))?;

    let vm = state
        .vms
        .create(new_vm)
        .await
        .map_err(|e| ApiError::from_repo("Failed to create VM", e))?;
    tracing::info!(vm_id = %vm.id, name = %vm.name, "VM created");
    Ok((StatusCode::CREATED, Json(vm)))
}

#[utoipa::path(
    put,
    path = "/vms/{id}",
    tag = "VMs",
    params(("id" = String, Path, description = "VM id")),
    request_body = UpdateVmRequest,
    responses(
        (status = 200, description = "Updated", body = Vm),
        (status = 400, description = "Missing status", body = vmdash_common::ErrorBody),
        (status = 404, description = "VM not found", body = vmdash_common::ErrorBody),
        (status = 500, description = "Datastore error", body = vmdash_common::ErrorBody)
    )
)]
pub async fn update_vm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateVmRequest>, JsonRejection>,
) -> Result<Json<Vm>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let update = payload
        .validate()
        .map_err(|missing| ApiError::missing_fields(&missing))?;

    match state.vms.update(&id, update).await {
        Ok(Some(vm)) => {
            tracing::info!(vm_id = %vm.id, status = %vm.status, "VM updated");
            Ok(Json(vm))
        }
        Ok(None) => Err(ApiError::vm_not_found()),
        Err(e) => Err(ApiError::from_repo("Failed to update VM", e)),
    }
}

#[utoipa::path(
    delete,
    path = "/vms/{id}",
    tag = "VMs",
    params(("id" = String, Path, description = "VM id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteVmResponse),
        (status = 404, description = "VM not found", body = vmdash_common::ErrorBody),
        (status = 500, description = "Datastore error", body = vmdash_common::ErrorBody)
    )
)]
pub async fn delete_vm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteVmResponse>, ApiError> {
    let deleted = state
        .vms
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_repo("Failed to delete VM", e))?;
    if !deleted {
        return Err(ApiError::vm_not_found());
    }
    tracing::info!(vm_id = %id, "VM deleted");
    Ok(Json(DeleteVmResponse {
        message: "VM deleted successfully".to_string(),
    }))
}
