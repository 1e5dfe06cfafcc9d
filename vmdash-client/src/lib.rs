//! Dashboard-side access to the VM API: HTTP transport, the cached
//! [`VmStore`] with its live/fallback modes, and the derived summaries.

pub mod api;
pub mod clone;
pub mod config;
pub mod error;
pub mod store;
pub mod summary;

pub use api::{HttpVmApi, VmApi};
pub use clone::CloneOptions;
pub use config::ClientConfig;
pub use error::StoreError;
pub use store::{StoreMode, VmStore};
pub use summary::{DashboardSummary, RegionHealth, RegionOverview, ResourceLevel};

/// Store over HTTP for the given configuration, with the initial fetch done.
pub async fn connect(config: &ClientConfig) -> Result<VmStore<HttpVmApi>, StoreError> {
    let api = HttpVmApi::new(config)?;
    tracing::info!("Connecting VM store to {}", api.base_url());
    Ok(VmStore::connect(api).await)
}
