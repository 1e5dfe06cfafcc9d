//! Client-side VM cache kept in sync with the VM API.
//!
//! The store starts in [`StoreMode::Loading`]. The outcome of a fetch decides
//! between [`StoreMode::Live`] (cache mirrors the server) and
//! [`StoreMode::Fallback`] (cache is the demo dataset, mutations stay local).
//! Only [`VmStore::refresh`] moves between modes.
//!
//! Mutation policy while live:
//!
//! | operation       | optimistic | on failure                    |
//! |-----------------|------------|-------------------------------|
//! | `update_status` | yes        | record restored to pre-call   |
//! | `create`        | no         | cache untouched               |
//! | `delete`        | no         | cache untouched               |
//!
//! Status updates to the same record are serialized; different records are
//! independent. The cache lock is never held across a network call.
//! A server answer that arrives after a refresh has switched the store out of
//! live mode is discarded, so server records never mix with fallback data.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use vmdash_common::{demo, CreateVmRequest, NewVm, StatusAction, UpdateVmRequest, Vm, VmStatus};

use crate::api::VmApi;
use crate::clone::{clone_payload, CloneOptions};
use crate::error::StoreError;
use crate::summary::{self, DashboardSummary, RegionOverview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Loading,
    Live,
    Fallback,
}

#[derive(Debug)]
struct StoreState {
    mode: StoreMode,
    vms: Vec<Vm>,
    error: Option<String>,
    refreshing: bool,
    // id -> number of update calls started and not yet settled
    updating: HashMap<String, usize>,
}

pub struct VmStore<A> {
    api: A,
    state: Mutex<StoreState>,
    record_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

fn local_record(vm: NewVm) -> Vm {
    let now = Utc::now();
    Vm {
        id: format!("vm-{}", uuid::Uuid::new_v4()),
        name: vm.name,
        region: vm.region,
        status: vm.status,
        cpu: vm.cpu,
        memory: vm.memory,
        storage: vm.storage,
        ip_address: vm.ip_address,
        created_at: now,
        updated_at: now,
    }
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + chrono::Duration::microseconds(1);
    Utc::now().max(floor)
}

impl<A: VmApi> VmStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState {
                mode: StoreMode::Loading,
                vms: Vec::new(),
                error: None,
                refreshing: false,
                updating: HashMap::new(),
            }),
            record_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build a store and run the initial fetch.
    pub async fn connect(api: A) -> Self {
        let store = Self::new(api);
        store.refresh().await;
        store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn mode(&self) -> StoreMode {
        self.state.lock().await.mode
    }

    pub async fn vms(&self) -> Vec<Vm> {
        self.state.lock().await.vms.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Vm> {
        self.state
            .lock()
            .await
            .vms
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    /// Last failure message: the fetch error behind fallback mode, or the
    /// most recent failed mutation.
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        let state = self.state.lock().await;
        state.mode == StoreMode::Loading || state.refreshing
    }

    pub async fn is_updating(&self, id: &str) -> bool {
        self.state.lock().await.updating.contains_key(id)
    }

    pub async fn summary(&self) -> DashboardSummary {
        summary::summarize(&self.state.lock().await.vms)
    }

    pub async fn region_overview(&self) -> Vec<RegionOverview> {
        summary::region_overview(&self.state.lock().await.vms)
    }

    /// Fetch the whole collection. Success replaces the cache and goes live;
    /// failure swaps in the demo dataset and switches to fallback mode.
    pub async fn refresh(&self) -> StoreMode {
        self.state.lock().await.refreshing = true;
        tracing::debug!("Fetching VMs from API...");
        let result = self.api.list_vms().await;

        let mut state = self.state.lock().await;
        state.refreshing = false;
        match result {
            Ok(vms) => {
                tracing::info!("Fetched {} VMs", vms.len());
                if state.mode != StoreMode::Live {
                    tracing::info!(from = ?state.mode, "VM store is live");
                }
                state.vms = vms;
                state.error = None;
                state.mode = StoreMode::Live;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch from API, using fallback data: {}", e);
                state.vms = demo::demo_vms();
                state.error = Some(e.to_string());
                state.mode = StoreMode::Fallback;
            }
        }
        state.mode
    }

    /// Set a VM's status, showing it in the cache before the server answers.
    pub async fn update_status(&self, id: &str, status: VmStatus) -> Result<Vm, StoreError> {
        if self.mode().await == StoreMode::Loading {
            return Err(StoreError::NotReady);
        }

        let record_lock = self.record_lock(id).await;
        self.mark_updating(id, true).await;
        let result = {
            let _guard = record_lock.lock().await;
            self.update_status_locked(id, status).await
        };
        self.mark_updating(id, false).await;
        drop(record_lock);
        self.release_record_lock(id).await;
        result
    }

    // Caller holds the record lock for `id`.
    async fn update_status_locked(&self, id: &str, status: VmStatus) -> Result<Vm, StoreError> {
        let previous = {
            let mut state = self.state.lock().await;
            let mode = state.mode;
            let Some(vm) = state.vms.iter_mut().find(|v| v.id == id) else {
                return Err(StoreError::NotFound(id.to_string()));
            };
            let previous = vm.clone();
            vm.status = status;
            if mode == StoreMode::Fallback {
                vm.updated_at = next_timestamp(previous.updated_at);
                tracing::debug!("Using fallback mode, updating {} locally only", id);
                return Ok(vm.clone());
            }
            previous
        };

        let request = UpdateVmRequest {
            status: Some(status),
            cpu: Some(previous.cpu),
            memory: Some(previous.memory),
            storage: Some(previous.storage),
        };
        let result = self.api.update_vm(id, &request).await;

        let Some(mut state) = self.live_state("update", id).await else {
            return result;
        };
        let slot = state.vms.iter_mut().find(|v| v.id == id);
        match result {
            Ok(server_vm) => {
                if let Some(slot) = slot {
                    *slot = server_vm.clone();
                }
                Ok(server_vm)
            }
            Err(e) => {
                tracing::warn!("Error updating VM {}: {}", id, e);
                if let Some(slot) = slot {
                    *slot = previous;
                }
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run a row action, refusing it locally when the current status rules it out.
    pub async fn apply_action(&self, id: &str, action: StatusAction) -> Result<Vm, StoreError> {
        if self.mode().await == StoreMode::Loading {
            return Err(StoreError::NotReady);
        }
        let current = self
            .get(id)
            .await
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !action.is_available(current.status) {
            return Err(StoreError::ActionUnavailable {
                action,
                status: current.status,
            });
        }
        self.update_status(id, action.target()).await
    }

    /// Add a VM. Live: the server's record is prepended once it answers.
    /// Fallback: a local record is synthesized and prepended.
    pub async fn create(&self, vm: NewVm) -> Result<Vm, StoreError> {
        let vm = CreateVmRequest::from(vm).validate().map_err(|missing| {
            StoreError::Invalid(format!("Missing required fields: {}", missing.join(", ")))
        })?;

        {
            let mut state = self.state.lock().await;
            match state.mode {
                StoreMode::Loading => return Err(StoreError::NotReady),
                StoreMode::Fallback => {
                    let local = local_record(vm);
                    state.vms.insert(0, local.clone());
                    return Ok(local);
                }
                StoreMode::Live => {}
            }
        }

        let result = self.api.create_vm(&vm).await;
        let Some(mut state) = self.live_state("create", &vm.name).await else {
            return result;
        };
        match result {
            Ok(created) => {
                // A refresh that raced this call may already list the record.
                state.vms.retain(|v| v.id != created.id);
                state.vms.insert(0, created.clone());
                Ok(created)
            }
            Err(e) => {
                tracing::warn!("Error creating VM {}: {}", vm.name, e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a copy of `source_id` with the given name/region and fresh usage figures.
    pub async fn clone_vm(&self, source_id: &str, options: &CloneOptions) -> Result<Vm, StoreError> {
        if self.mode().await == StoreMode::Loading {
            return Err(StoreError::NotReady);
        }
        if self.get(source_id).await.is_none() {
            return Err(StoreError::NotFound(source_id.to_string()));
        }
        if options.name.trim().is_empty() {
            return Err(StoreError::Invalid("Clone name is required".to_string()));
        }
        let payload = clone_payload(&mut rand::thread_rng(), options);
        self.create(payload).await
    }

    /// Remove a VM. Live: removed from the cache only after the server confirms.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock().await;
            match state.mode {
                StoreMode::Loading => return Err(StoreError::NotReady),
                _ if !state.vms.iter().any(|v| v.id == id) => {
                    return Err(StoreError::NotFound(id.to_string()));
                }
                StoreMode::Fallback => {
                    state.vms.retain(|v| v.id != id);
                    return Ok(());
                }
                StoreMode::Live => {}
            }
        }

        let result = self.api.delete_vm(id).await;
        let Some(mut state) = self.live_state("delete", id).await else {
            return result;
        };
        match result {
            Ok(()) => {
                state.vms.retain(|v| v.id != id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error deleting VM {}: {}", id, e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cache guard for applying a server answer, or `None` when the store left
    /// live mode while the request was in flight. The answer then belongs to a
    /// cache that has been replaced and is dropped.
    async fn live_state(&self, op: &str, subject: &str) -> Option<MutexGuard<'_, StoreState>> {
        let state = self.state.lock().await;
        if state.mode == StoreMode::Live {
            return Some(state);
        }
        tracing::warn!(
            "Discarding {} result for VM {}: store is now in {:?} mode",
            op,
            subject,
            state.mode
        );
        None
    }

    async fn record_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.record_locks
            .lock()
            .await
            .entry(id.to_string())
            .or_default()
            .clone()
    }

    async fn release_record_lock(&self, id: &str) {
        let mut locks = self.record_locks.lock().await;
        if locks.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(id);
        }
    }

    async fn mark_updating(&self, id: &str, started: bool) {
        let mut state = self.state.lock().await;
        if started {
            *state.updating.entry(id.to_string()).or_insert(0) += 1;
        } else if let Some(n) = state.updating.get_mut(id) {
            *n -= 1;
            if *n == 0 {
                state.updating.remove(id);
            }
        }
    }
}
