// Datastore abstraction for the `vms` collection.
pub mod memory;
pub mod postgres;
pub mod unconfigured;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use vmdash_common::{NewVm, Vm, VmUpdate};

pub use memory::InMemoryVmRepository;
pub use postgres::PgVmRepository;
pub use unconfigured::UnconfiguredVmRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("DATABASE_URL environment variable is not set")]
    NotConfigured,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot reported by the diagnostics endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatastoreInfo {
    pub current_time: DateTime<Utc>,
    pub version: String,
    pub vms_table_exists: bool,
    pub vm_count: i64,
}

/// One statement per operation; implementations never retry.
#[async_trait]
pub trait VmRepository: Send + Sync {
    /// All records, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Vm>, RepoError>;

    /// Insert and return the stored record with its assigned id and timestamps.
    async fn create(&self, vm: NewVm) -> Result<Vm, RepoError>;

    /// Apply `update` and refresh `updated_at`. `Ok(None)` when the id is unknown.
    async fn update(&self, id: &str, update: VmUpdate) -> Result<Option<Vm>, RepoError>;

    /// `Ok(false)` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, RepoError>;

    async fn info(&self) -> Result<DatastoreInfo, RepoError>;
}

/// Timestamp for a mutation of a record last touched at `previous`, kept
/// strictly after it even when the clock has not advanced.
pub(crate) fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + chrono::Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}
