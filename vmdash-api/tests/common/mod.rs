// Common test utilities and fixtures
#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use vmdash_api::config::database::create_pool;
use vmdash_api::repository::{InMemoryVmRepository, PgVmRepository, VmRepository};
use vmdash_api::routes::create_app;
use vmdash_api::setup::run_migrations;
use vmdash_api::AppState;

/// Router backed by the given repository, with CORS applied like in main.rs
pub fn create_test_app(repo: Arc<dyn VmRepository>, configured: bool) -> Router {
    create_app(AppState::new(repo, configured))
}

/// Test server over a fresh in-memory collection; the repository handle is
/// returned so tests can inject outages.
pub fn in_memory_server() -> (TestServer, Arc<InMemoryVmRepository>) {
    let repo = Arc::new(InMemoryVmRepository::new());
    let app = create_test_app(repo.clone(), true);
    (TestServer::new(app).expect("Failed to start test server"), repo)
}

pub fn vm_payload(name: &str) -> Value {
    json!({
        "name": name,
        "region": "US East (N. Virginia)",
        "status": "Starting",
        "ipAddress": "1.2.3.4"
    })
}

/// Postgres pool for tests, or `None` when TEST_DATABASE_URL is not set.
pub async fn test_db_pool() -> Option<Pool<Postgres>> {
    let Some(url) = std::env::var("TEST_DATABASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
    else {
        eprintln!("skipping integration test: TEST_DATABASE_URL not set");
        return None;
    };
    let pool = create_pool(&url, 5).expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations on test database");
    Some(pool)
}

pub fn postgres_server(pool: Pool<Postgres>) -> TestServer {
    let app = create_test_app(Arc::new(PgVmRepository::new(pool)), true);
    TestServer::new(app).expect("Failed to start test server")
}

/// Remove rows created by tests (names prefixed with `test-`).
pub async fn cleanup_test_vms(pool: &Pool<Postgres>) {
    sqlx::query("DELETE FROM vms WHERE name LIKE 'test-%'")
        .execute(pool)
        .await
        .ok();
}
