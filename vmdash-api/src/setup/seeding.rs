use vmdash_common::demo;

use crate::repository::{RepoError, VmRepository};

/// Optional dev convenience: insert the demo VMs when the collection is empty.
/// Guarded by `AUTO_SEED_VMS` to avoid accidental seeding in staging/prod.
/// Returns the number of records inserted.
pub async fn maybe_seed_demo_vms(repo: &dyn VmRepository, enabled: bool) -> Result<usize, RepoError> {
    if !enabled {
        return Ok(0);
    }

    if !repo.list().await?.is_empty() {
        tracing::debug!("AUTO_SEED_VMS: vms table not empty, skipping");
        return Ok(0);
    }

    let seeds = demo::demo_vms();
    // Insert oldest first so list order matches the demo order.
    for vm in seeds.iter().rev() {
        repo.create(vm.to_new_vm()).await?;
    }
    tracing::info!("🌱 AUTO_SEED_VMS: seeded {} demo VMs", seeds.len());
    Ok(seeds.len())
}
