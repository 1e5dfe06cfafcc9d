use thiserror::Error;
use vmdash_common::{StatusAction, VmStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response; `message` is the body's `details`, else its
    /// `error`, else the HTTP status line.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("VM {0} not found")]
    NotFound(String),

    #[error("VM list has not been loaded yet")]
    NotReady,

    #[error("{action:?} is not available while the VM is {status}")]
    ActionUnavailable { action: StatusAction, status: VmStatus },

    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Api { status: 404, .. })
    }
}
