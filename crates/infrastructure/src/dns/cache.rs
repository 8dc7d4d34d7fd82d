pub mod coarse_clock;
pub mod eviction;
pub mod key;
pub mod metrics;
pub mod record;
pub mod storage;

pub use eviction::EvictionStrategy;
pub use key::CacheKey;
pub use metrics::CacheMetrics;
pub use record::CachedResponse;
pub use storage::{DnsCache, DnsCacheConfig};
