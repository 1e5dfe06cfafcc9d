use rand::Rng;
use std::net::Ipv4Addr;
use vmdash_common::{NewVm, Region, Vm, VmStatus};

/// What the user picks when cloning a VM.
#[derive(Debug, Clone)]
pub struct CloneOptions {
    pub name: String,
    pub region: Region,
    /// Start the clone right away (`Starting`) instead of leaving it `Terminated`.
    pub auto_start: bool,
}

impl CloneOptions {
    /// Defaults: `<source>-clone`, same region when it is a known one.
    pub fn for_source(source: &Vm) -> Self {
        Self {
            name: format!("{}-clone", source.name),
            region: source.region.parse().unwrap_or(Region::UsEastVirginia),
            auto_start: false,
        }
    }
}

/// Create payload for a fresh clone. Usage figures start low and the clone
/// gets its own address; nothing is copied from the source but the shape.
pub fn clone_payload<R: Rng + ?Sized>(rng: &mut R, options: &CloneOptions) -> NewVm {
    let ip = Ipv4Addr::new(
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255),
    );
    NewVm {
        name: options.name.trim().to_string(),
        region: options.region.to_string(),
        status: if options.auto_start {
            VmStatus::Starting
        } else {
            VmStatus::Terminated
        },
        cpu: rng.gen_range(10..40),
        memory: rng.gen_range(20..60),
        storage: rng.gen_range(30..80),
        ip_address: ip.to_string(),
    }
}
