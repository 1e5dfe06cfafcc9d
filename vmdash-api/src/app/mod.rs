// Shared state and HTTP layers for the VM API
pub mod state;

pub use state::AppState;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin may call the VM collection; the dashboard is served elsewhere.
pub fn create_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::CACHE_CONTROL])
}
