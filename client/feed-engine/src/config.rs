use serde::{Deserialize, Serialize};

use classloop_api_client::ApiConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub likes: LikeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size of the single fetch-all list call. The feed is loaded in
    /// one page and filtered client-side; collections larger than this are
    /// silently truncated by the server, which caps how far the feed scales.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// School id that marks a post as school-wide
    #[serde(default = "default_canonical_school_id")]
    pub canonical_school_id: i64,
    #[serde(default)]
    pub stale_fetch_policy: StaleFetchPolicy,
}

/// What to do with a fetch that resolves after the viewer changed mid-flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleFetchPolicy {
    /// Drop the result; the caller refreshes for the new viewer
    #[default]
    Discard,
    /// Install the result anyway (the legacy stale-overwrite behavior)
    Apply,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeConfig {
    /// Disable the per-post in-flight guard and allow overlapping toggles
    /// on the same post (the legacy unguarded behavior)
    #[serde(default)]
    pub allow_concurrent_toggles: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            canonical_school_id: default_canonical_school_id(),
            stale_fetch_policy: StaleFetchPolicy::default(),
        }
    }
}

impl Default for LikeConfig {
    fn default() -> Self {
        Self {
            allow_concurrent_toggles: false,
        }
    }
}

impl Config {
    /// Config with defaults everywhere except the API connection
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            feed: FeedConfig::default(),
            likes: LikeConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            api: ApiConfig::from_env()?,
            feed: FeedConfig {
                page_size: std::env::var("FEED_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_page_size),
                canonical_school_id: std::env::var("CANONICAL_SCHOOL_ID")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_canonical_school_id),
                stale_fetch_policy: std::env::var("FEED_STALE_FETCH_POLICY")
                    .ok()
                    .map(|v| StaleFetchPolicy::parse(&v))
                    .unwrap_or_default(),
            },
            likes: LikeConfig {
                allow_concurrent_toggles: std::env::var("LIKES_ALLOW_CONCURRENT_TOGGLES")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            },
        })
    }
}

impl StaleFetchPolicy {
    /// Unrecognized values fall back to the default
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "apply" => StaleFetchPolicy::Apply,
            _ => StaleFetchPolicy::Discard,
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_canonical_school_id() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(ApiConfig::new("https://api.school.example"));
        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.feed.canonical_school_id, 1);
        assert_eq!(config.feed.stale_fetch_policy, StaleFetchPolicy::Discard);
        assert!(!config.likes.allow_concurrent_toggles);
    }

    #[test]
    fn test_stale_fetch_policy_parse() {
        assert_eq!(StaleFetchPolicy::parse("apply"), StaleFetchPolicy::Apply);
        assert_eq!(StaleFetchPolicy::parse("Apply"), StaleFetchPolicy::Apply);
        assert_eq!(
            StaleFetchPolicy::parse("discard"),
            StaleFetchPolicy::Discard
        );
        assert_eq!(StaleFetchPolicy::parse("junk"), StaleFetchPolicy::Discard);
    }
}
