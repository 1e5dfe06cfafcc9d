//! Aggregates the dashboard header, map view and resource bars are drawn from.

use vmdash_common::{Region, Vm, VmStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: usize,
    pub running: usize,
    /// Count per status, in `VmStatus::ALL` order.
    pub by_status: Vec<(VmStatus, usize)>,
}

pub fn summarize(vms: &[Vm]) -> DashboardSummary {
    let by_status: Vec<(VmStatus, usize)> = VmStatus::ALL
        .into_iter()
        .map(|st| (st, vms.iter().filter(|v| v.status == st).count()))
        .collect();
    DashboardSummary {
        total: vms.len(),
        running: vms.iter().filter(|v| v.status == VmStatus::Running).count(),
        by_status,
    }
}

/// Map marker state for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionHealth {
    Empty,
    AllRunning,
    NoneRunning,
    Mixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionOverview {
    pub region: Region,
    pub vm_count: usize,
    pub running: usize,
    pub health: RegionHealth,
}

/// One entry per known region. Records whose region is not one of the named
/// regions are not placed on the map.
pub fn region_overview(vms: &[Vm]) -> Vec<RegionOverview> {
    Region::ALL
        .into_iter()
        .map(|region| {
            let in_region: Vec<&Vm> = vms.iter().filter(|v| v.region == region.as_str()).collect();
            let vm_count = in_region.len();
            let running = in_region
                .iter()
                .filter(|v| v.status == VmStatus::Running)
                .count();
            let health = match (vm_count, running) {
                (0, _) => RegionHealth::Empty,
                (n, r) if r == n => RegionHealth::AllRunning,
                (_, 0) => RegionHealth::NoneRunning,
                _ => RegionHealth::Mixed,
            };
            RegionOverview {
                region,
                vm_count,
                running,
                health,
            }
        })
        .collect()
}

/// Usage band for a cpu/memory/storage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceLevel {
    Normal,
    Elevated,
    Critical,
}

impl ResourceLevel {
    pub fn for_usage(percent: i32) -> Self {
        match percent {
            p if p >= 80 => ResourceLevel::Critical,
            p if p >= 60 => ResourceLevel::Elevated,
            _ => ResourceLevel::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmdash_common::demo::demo_vms;

    #[test]
    fn summary_of_demo_data() {
        let s = summarize(&demo_vms());
        assert_eq!(s.total, 5);
        assert_eq!(s.running, 2);
        assert_eq!(s.by_status[0], (VmStatus::Running, 2));
        assert_eq!(s.by_status.iter().map(|(_, n)| n).sum::<usize>(), 5);
    }

    #[test]
    fn region_health_matches_marker_rules() {
        let mut vms = demo_vms();
        // Second VM in US East, not running -> mixed.
        let mut extra = vms[3].clone();
        extra.id = "vm-006".into();
        extra.region = Region::UsEastVirginia.to_string();
        vms.push(extra);

        let overview = region_overview(&vms);
        let health = |r: Region| overview.iter().find(|o| o.region == r).unwrap().health;
        assert_eq!(health(Region::UsEastVirginia), RegionHealth::Mixed);
        assert_eq!(health(Region::EuWestIreland), RegionHealth::AllRunning);
        assert_eq!(health(Region::UsWestOregon), RegionHealth::NoneRunning);
        assert_eq!(region_overview(&[])[0].health, RegionHealth::Empty);
    }

    #[test]
    fn resource_levels() {
        assert_eq!(ResourceLevel::for_usage(0), ResourceLevel::Normal);
        assert_eq!(ResourceLevel::for_usage(59), ResourceLevel::Normal);
        assert_eq!(ResourceLevel::for_usage(60), ResourceLevel::Elevated);
        assert_eq!(ResourceLevel::for_usage(80), ResourceLevel::Critical);
        assert_eq!(ResourceLevel::for_usage(250), ResourceLevel::Critical);
    }
}
