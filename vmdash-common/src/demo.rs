//! Fixed demo dataset shown when the API is unreachable, and optionally
//! seeded into an empty database.

use chrono::{DateTime, Utc};

use crate::{Region, Vm, VmStatus};

// 2024-01-15T09:00:00Z
const DEMO_EPOCH_SECS: i64 = 1_705_309_200;

fn demo_time(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(DEMO_EPOCH_SECS + hours * 3600, 0).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn demo_vm(
    n: i64,
    name: &str,
    region: Region,
    status: VmStatus,
    cpu: i32,
    memory: i32,
    storage: i32,
    ip_address: &str,
) -> Vm {
    Vm {
        id: format!("vm-{n:03}"),
        name: name.to_string(),
        region: region.to_string(),
        status,
        cpu,
        memory,
        storage,
        ip_address: ip_address.to_string(),
        created_at: demo_time(n),
        updated_at: demo_time(n),
    }
}

pub fn demo_vms() -> Vec<Vm> {
    vec![
        demo_vm(1, "web-server-prod", Region::UsEastVirginia, VmStatus::Running, 75, 68, 45, "54.123.45.67"),
        demo_vm(2, "database-primary", Region::EuWestIreland, VmStatus::Running, 45, 82, 67, "34.245.78.90"),
        demo_vm(3, "api-gateway", Region::AsiaPacificTokyo, VmStatus::Idling, 12, 25, 23, "13.114.56.78"),
        demo_vm(4, "backup-server", Region::UsWestOregon, VmStatus::Terminated, 0, 0, 89, "52.89.123.45"),
        demo_vm(5, "dev-environment", Region::EuCentralFrankfurt, VmStatus::Starting, 35, 40, 15, "18.195.67.89"),
    ]
}
