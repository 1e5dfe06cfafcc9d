use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tokio::sync::RwLock;
use vmdash_common::{NewVm, Vm, VmUpdate};

use super::{next_updated_at, DatastoreInfo, RepoError, VmRepository};

/// Process-local `vms` collection with the same ordering and timestamp rules
/// as the Postgres table. Used by tests and local demos.
#[derive(Debug, Default)]
pub struct InMemoryVmRepository {
    // Newest first.
    vms: RwLock<Vec<Vm>>,
    outage: Mutex<Option<String>>,
}

impl InMemoryVmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vms(mut vms: Vec<Vm>) -> Self {
        vms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            vms: RwLock::new(vms),
            outage: Mutex::new(None),
        }
    }

    /// Make every following call fail with `reason` until cleared with `None`.
    pub fn set_outage(&self, reason: Option<&str>) {
        if let Ok(mut guard) = self.outage.lock() {
            *guard = reason.map(str::to_string);
        }
    }

    fn check_available(&self) -> Result<(), RepoError> {
        match self.outage.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(reason) => Err(RepoError::Unavailable(reason.clone())),
                None => Ok(()),
            },
            Err(_) => Err(RepoError::Unavailable("lock poisoned".into())),
        }
    }
}

#[async_trait]
impl VmRepository for InMemoryVmRepository {
    async fn list(&self) -> Result<Vec<Vm>, RepoError> {
        self.check_available()?;
        Ok(self.vms.read().await.clone())
    }

    async fn create(&self, vm: NewVm) -> Result<Vm, RepoError> {
        self.check_available()?;
        let mut vms = self.vms.write().await;
        let now = Utc::now();
        let created_at = match vms.first() {
            Some(newest) => next_updated_at(newest.created_at, now),
            None => now,
        };
        let row = Vm {
            id: uuid::Uuid::new_v4().to_string(),
            name: vm.name,
            region: vm.region,
            status: vm.status,
            cpu: vm.cpu,
            memory: vm.memory,
            storage: vm.storage,
            ip_address: vm.ip_address,
            created_at,
            updated_at: created_at,
        };
        vms.insert(0, row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, update: VmUpdate) -> Result<Option<Vm>, RepoError> {
        self.check_available()?;
        let mut vms = self.vms.write().await;
        let Some(row) = vms.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        row.status = update.status;
        if let Some(cpu) = update.cpu {
            row.cpu = cpu;
        }
        if let Some(memory) = update.memory {
            row.memory = memory;
        }
        if let Some(storage) = update.storage {
            row.storage = storage;
        }
        row.updated_at = next_updated_at(row.updated_at, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        self.check_available()?;
        let mut vms = self.vms.write().await;
        let before = vms.len();
        vms.retain(|v| v.id != id);
        Ok(vms.len() < before)
    }

    async fn info(&self) -> Result<DatastoreInfo, RepoError> {
        self.check_available()?;
        let current_time: DateTime<Utc> = Utc::now();
        Ok(DatastoreInfo {
            current_time,
            version: "in-memory".to_string(),
            vms_table_exists: true,
            vm_count: self.vms.read().await.len() as i64,
        })
    }
}
