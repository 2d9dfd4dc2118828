//! DigitalOcean API configuration.

use serde::{Deserialize, Serialize};

/// DigitalOcean API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Personal access token. Needs read scope, plus delete scope when
    /// `sweep.delete_stale` is enabled. Supports `${VAR}` interpolation.
    pub token: String,

    /// API endpoint. Overridable for tests and API-compatible proxies.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Droplets requested per listing page (the API caps this at 200).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_base_url() -> String {
    "https://api.digitalocean.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_per_page() -> u32 {
    200
}
