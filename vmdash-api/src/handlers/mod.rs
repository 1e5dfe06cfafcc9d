// Handlers module - Centralizes all request handlers
pub mod debug;
pub mod vms;
