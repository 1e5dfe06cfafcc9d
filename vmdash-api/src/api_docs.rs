use crate::handlers::{debug, vms};
use crate::routes::public;
use crate::version::VersionInfo;
use vmdash_common::{CreateVmRequest, DeleteVmResponse, ErrorBody, UpdateVmRequest, Vm, VmStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        vms::list_vms,
        vms::create_vm,
        vms::update_vm,
        vms::delete_vm,
        debug::debug_datastore,
        public::get_version
    ),
    components(
        schemas(
            Vm,
            VmStatus,
            CreateVmRequest,
            UpdateVmRequest,
            DeleteVmResponse,
            ErrorBody,
            VersionInfo
        )
    ),
    tags(
        (name = "VMs", description = "VM record collection"),
        (name = "Diagnostics", description = "Version and datastore checks")
    )
)]
pub struct ApiDoc;
