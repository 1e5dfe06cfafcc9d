use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8003";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the VM API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            ..Self::default()
        }
    }

    /// Reads `VMDASH_API_URL` and `VMDASH_API_TIMEOUT_SECS`; unset, blank or
    /// unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("VMDASH_API_URL")
            .filter(|s| !s.trim().is_empty())
            .map(|s| normalize_url(&s))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = lookup("VMDASH_API_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { api_url, timeout }
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
