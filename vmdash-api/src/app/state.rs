use std::sync::Arc;

use crate::repository::VmRepository;

#[derive(Clone)]
pub struct AppState {
    pub vms: Arc<dyn VmRepository>,
    /// Whether a connection string was supplied at startup.
    pub database_configured: bool,
}

impl AppState {
    pub fn new(vms: Arc<dyn VmRepository>, database_configured: bool) -> Arc<Self> {
        Arc::new(Self {
            vms,
            database_configured,
        })
    }
}
