// Routes module - Centralizes all route definitions
pub mod public;
pub mod vms;

use axum::Router;
use crate::app::AppState;
use std::sync::Arc;

/// Build the main application router
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(public::create_public_routes())
        .merge(vms::create_vm_routes())
}

/// Router with state attached and CORS applied, ready to serve.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_router()
        .layer(crate::app::create_cors())
        .with_state(state)
}
