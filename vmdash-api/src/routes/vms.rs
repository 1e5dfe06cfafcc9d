// VM collection routes
use crate::app::AppState;
use axum::routing::{get, put};
use axum::Router;
use std::sync::Arc;

use crate::handlers::vms::{create_vm, delete_vm, list_vms, update_vm};

pub fn create_vm_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vms", get(list_vms).post(create_vm))
        .route("/vms/{id}", put(update_vm).delete(delete_vm))
}
