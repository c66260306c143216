use serde::{Deserialize, Serialize};

/// Connection settings for the school REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API host, e.g. `https://api.school.example`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(ApiConfig {
            base_url: std::env::var("SCHOOL_API_BASE_URL")?,
            timeout_secs: std::env::var("SCHOOL_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout_secs),
        })
    }
}

fn default_timeout_secs() -> u64 {
    30
}
