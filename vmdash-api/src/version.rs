// Version information module

/// Server version: `VMDASH_VERSION` when set (release builds stamp it), else
/// the crate version.
pub fn get_backend_version() -> String {
    std::env::var("VMDASH_VERSION")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct VersionInfo {
    pub backend_version: String,
    pub server_time: String,
}

pub fn get_version_info() -> VersionInfo {
    VersionInfo {
        backend_version: get_backend_version(),
        server_time: chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    }
}
