use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// RAWG API key used for enrichment lookups
    pub rawg_api_key: String,

    /// RAWG API base URL
    #[serde(default = "default_rawg_api_url")]
    pub rawg_api_url: String,

    /// Redis connection URL for the user profile store
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Path to the game catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound for a single enrichment lookup, in seconds
    #[serde(default = "default_enrichment_timeout_secs")]
    pub enrichment_timeout_secs: u64,

    /// Number of enrichment lookups allowed in flight across all requests
    #[serde(default = "default_enrichment_workers")]
    pub enrichment_workers: usize,

    /// Number of enrichment results kept in memory
    #[serde(default = "default_enrichment_cache_capacity")]
    pub enrichment_cache_capacity: usize,

    /// How many catalog entries are selected per recommendation
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_rawg_api_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_catalog_path() -> String {
    "./games_dataset.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_enrichment_timeout_secs() -> u64 {
    5
}

fn default_enrichment_workers() -> usize {
    3
}

fn default_enrichment_cache_capacity() -> usize {
    100
}

fn default_recommendation_count() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.rawg_api_key.trim().is_empty() {
            anyhow::bail!("RAWG_API_KEY must not be empty");
        }
        if self.enrichment_workers == 0 {
            anyhow::bail!("ENRICHMENT_WORKERS must be at least 1");
        }
        if self.enrichment_cache_capacity == 0 {
            anyhow::bail!("ENRICHMENT_CACHE_CAPACITY must be at least 1");
        }
        if self.recommendation_count == 0 {
            anyhow::bail!("RECOMMENDATION_COUNT must be at least 1");
        }
        Ok(())
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }
}
