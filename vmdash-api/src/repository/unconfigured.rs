use async_trait::async_trait;
use vmdash_common::{NewVm, Vm, VmUpdate};

use super::{DatastoreInfo, RepoError, VmRepository};

/// Stand-in used when no connection string was provided: every call reports
/// [`RepoError::NotConfigured`] so the API can answer with a configuration
/// error instead of a generic failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredVmRepository;

#[async_trait]
impl VmRepository for UnconfiguredVmRepository {
    async fn list(&self) -> Result<Vec<Vm>, RepoError> {
        Err(RepoError::NotConfigured)
    }

    async fn create(&self, _vm: NewVm) -> Result<Vm, RepoError> {
        Err(RepoError::NotConfigured)
    }

    async fn update(&self, _id: &str, _update: VmUpdate) -> Result<Option<Vm>, RepoError> {
        Err(RepoError::NotConfigured)
    }

    async fn delete(&self, _id: &str) -> Result<bool, RepoError> {
        Err(RepoError::NotConfigured)
    }

    async fn info(&self) -> Result<DatastoreInfo, RepoError> {
        Err(RepoError::NotConfigured)
    }
}
