use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;

/// Create and configure database connection pool.
///
/// Connections are opened on first use, so an unreachable database surfaces
/// as per-request datastore errors instead of a startup failure.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<Pool<Postgres>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)
}
