use crate::types::LeadStatus;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `REMINDHUB__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Audit-log field the funnel engine tracks.
    #[serde(default = "default_tracked_field")]
    pub tracked_field: String,
    /// Canonical funnel order. Configuration, not derived data: the
    /// summarizer walks this list in adjacent pairs.
    #[serde(default = "default_funnel_stages")]
    pub funnel_stages: Vec<LeadStatus>,
    /// How many source buckets the overview surfaces.
    #[serde(default = "default_top_sources_limit")]
    pub top_sources_limit: usize,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

fn default_tracked_field() -> String {
    "status".to_string()
}

fn default_funnel_stages() -> Vec<LeadStatus> {
    vec![
        LeadStatus::New,
        LeadStatus::NotFollowedUp,
        LeadStatus::FollowedUp,
        LeadStatus::InProgress,
        LeadStatus::PickedUp,
        LeadStatus::SignContract,
        LeadStatus::Completed,
    ]
}

fn default_top_sources_limit() -> usize {
    6
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_cache_max_entries() -> usize {
    1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracked_field: default_tracked_field(),
            funnel_stages: default_funnel_stages(),
            top_sources_limit: default_top_sources_limit(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("REMINDHUB")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
