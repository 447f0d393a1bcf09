use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Number of search result pages requested per fetch
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Timeout applied to every metadata request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on detail lookups in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Recommendations returned when a request doesn't ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_max_pages() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_top_n() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Knobs the session layer needs, detached from server/provider settings
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            max_pages: self.max_pages.max(1),
            max_concurrent_requests: self.max_concurrent_requests.max(1),
            default_top_n: self.default_top_n,
        }
    }
}

/// Tuning for a single fetch/recommend round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub max_pages: u32,
    pub max_concurrent_requests: usize,
    pub default_top_n: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_concurrent_requests: default_max_concurrent_requests(),
            default_top_n: default_top_n(),
        }
    }
}
