use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionStrategyName {
    #[default]
    Lru,
    Lfu,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default)]
    pub eviction_strategy: EvictionStrategyName,

    /// Lower clamp for cached TTLs. A TTL of 0 is never cached regardless.
    #[serde(default)]
    pub min_ttl: u32,

    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,

    /// Share of entries dropped when the cache is full and nothing has expired.
    #[serde(default = "default_batch_eviction_percentage")]
    pub batch_eviction_percentage: f64,

    #[serde(default = "default_maintenance_interval_secs")]
    pub maintenance_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            eviction_strategy: EvictionStrategyName::default(),
            min_ttl: 0,
            max_ttl: default_max_ttl(),
            batch_eviction_percentage: default_batch_eviction_percentage(),
            maintenance_interval_secs: default_maintenance_interval_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_ttl() -> u32 {
    86_400
}

fn default_batch_eviction_percentage() -> f64 {
    0.1
}

fn default_maintenance_interval_secs() -> u64 {
    60
}
