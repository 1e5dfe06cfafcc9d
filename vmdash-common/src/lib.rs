use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod demo;

// --- Enums ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, utoipa::ToSchema)]
#[sqlx(type_name = "vm_status")]
pub enum VmStatus {
    Running,
    Idling,
    Terminated,
    Starting,
    Stopping,
}

impl VmStatus {
    pub const ALL: [VmStatus; 5] = [
        VmStatus::Running,
        VmStatus::Idling,
        VmStatus::Terminated,
        VmStatus::Starting,
        VmStatus::Stopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VmStatus::Running => "Running",
            VmStatus::Idling => "Idling",
            VmStatus::Terminated => "Terminated",
            VmStatus::Starting => "Starting",
            VmStatus::Stopping => "Stopping",
        }
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VmStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VmStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// Named regions a VM can be placed in. Records store the display name as a
/// flat string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    UsEastVirginia,
    UsWestOregon,
    EuWestIreland,
    EuCentralFrankfurt,
    AsiaPacificTokyo,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::UsEastVirginia,
        Region::UsWestOregon,
        Region::EuWestIreland,
        Region::EuCentralFrankfurt,
        Region::AsiaPacificTokyo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::UsEastVirginia => "US East (N. Virginia)",
            Region::UsWestOregon => "US West (Oregon)",
            Region::EuWestIreland => "EU West (Ireland)",
            Region::EuCentralFrankfurt => "EU Central (Frankfurt)",
            Region::AsiaPacificTokyo => "Asia Pacific (Tokyo)",
        }
    }

    pub fn country(self) -> &'static str {
        match self {
            Region::UsEastVirginia | Region::UsWestOregon => "USA",
            Region::EuWestIreland => "Ireland",
            Region::EuCentralFrankfurt => "Germany",
            Region::AsiaPacificTokyo => "Japan",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ParseError::UnknownRegion(s.to_string()))
    }
}

/// Status changes offered on a VM row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Start,
    Idle,
    Stop,
    Terminate,
}

impl StatusAction {
    pub fn target(self) -> VmStatus {
        match self {
            StatusAction::Start => VmStatus::Running,
            StatusAction::Idle => VmStatus::Idling,
            StatusAction::Stop => VmStatus::Stopping,
            StatusAction::Terminate => VmStatus::Terminated,
        }
    }

    pub fn is_available(self, current: VmStatus) -> bool {
        match self {
            StatusAction::Start => current != VmStatus::Running,
            StatusAction::Idle => current != VmStatus::Idling,
            StatusAction::Stop => !matches!(current, VmStatus::Terminated | VmStatus::Stopping),
            StatusAction::Terminate => current != VmStatus::Terminated,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown VM status: {0}")]
    UnknownStatus(String),
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

// --- Entities (SQLx Mapped) ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    pub id: String,
    pub name: String,
    pub region: String,
    pub status: VmStatus,
    pub cpu: i32,
    pub memory: i32,
    pub storage: i32,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vm {
    /// Build the create payload that would reproduce this record's fields.
    pub fn to_new_vm(&self) -> NewVm {
        NewVm {
            name: self.name.clone(),
            region: self.region.clone(),
            status: self.status,
            cpu: self.cpu,
            memory: self.memory,
            storage: self.storage,
            ip_address: self.ip_address.clone(),
        }
    }
}

// --- DTOs ---

/// A fully specified VM ready to be inserted. Serializes as the `POST /vms` body.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewVm {
    pub name: String,
    pub region: String,
    pub status: VmStatus,
    pub cpu: i32,
    pub memory: i32,
    pub storage: i32,
    pub ip_address: String,
}

/// Incoming `POST /vms` body. Every field is optional on the wire so that
/// missing fields are reported by [`CreateVmRequest::validate`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVmRequest {
    pub name: Option<String>,
    pub region: Option<String>,
    pub status: Option<VmStatus>,
    pub cpu: Option<i32>,
    pub memory: Option<i32>,
    pub storage: Option<i32>,
    pub ip_address: Option<String>,
}

pub const REQUIRED_CREATE_FIELDS: [&str; 4] = ["name", "region", "status", "ipAddress"];

impl CreateVmRequest {
    /// Returns the insertable VM, or the camelCase names of the required
    /// fields that are absent or blank.
    pub fn validate(self) -> Result<NewVm, Vec<&'static str>> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        let name = present(self.name);
        let region = present(self.region);
        let ip_address = present(self.ip_address);

        match (name, region, self.status, ip_address) {
            (Some(name), Some(region), Some(status), Some(ip_address)) => Ok(NewVm {
                name,
                region,
                status,
                cpu: self.cpu.unwrap_or(0),
                memory: self.memory.unwrap_or(0),
                storage: self.storage.unwrap_or(0),
                ip_address,
            }),
            (name, region, status, ip) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if region.is_none() {
                    missing.push("region");
                }
                if status.is_none() {
                    missing.push("status");
                }
                if ip.is_none() {
                    missing.push("ipAddress");
                }
                Err(missing)
            }
        }
    }
}

impl From<NewVm> for CreateVmRequest {
    fn from(vm: NewVm) -> Self {
        Self {
            name: Some(vm.name),
            region: Some(vm.region),
            status: Some(vm.status),
            cpu: Some(vm.cpu),
            memory: Some(vm.memory),
            storage: Some(vm.storage),
            ip_address: Some(vm.ip_address),
        }
    }
}

/// `PUT /vms/{id}` body. Absent resource fields keep their stored value.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVmRequest {
    pub status: Option<VmStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<i32>,
}

/// Validated form of [`UpdateVmRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmUpdate {
    pub status: VmStatus,
    pub cpu: Option<i32>,
    pub memory: Option<i32>,
    pub storage: Option<i32>,
}

impl UpdateVmRequest {
    pub fn validate(self) -> Result<VmUpdate, Vec<&'static str>> {
        match self.status {
            Some(status) => Ok(VmUpdate {
                status,
                cpu: self.cpu,
                memory: self.memory,
                storage: self.storage,
            }),
            None => Err(vec!["status"]),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct DeleteVmResponse {
    pub message: String,
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    // Proxies and older servers answer with a bare `{error}`.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
            timestamp: Utc::now(),
        }
    }

    /// The most specific human-readable message in the body.
    pub fn message(&self) -> &str {
        self.details.as_deref().unwrap_or(&self.error)
    }
}
