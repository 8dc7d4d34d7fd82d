use super::lfu::LfuPolicy;
use super::lru::LruPolicy;
use super::policy::EvictionPolicy;
use super::strategy::EvictionStrategy;
use crate::dns::cache::record::CachedResponse;

/// The configured policy, dispatched by match rather than through a vtable.
pub enum ActiveEvictionPolicy {
    Lru(LruPolicy),
    Lfu(LfuPolicy),
}

impl ActiveEvictionPolicy {
    pub fn from_config(strategy: EvictionStrategy) -> Self {
        match strategy {
            EvictionStrategy::LRU => Self::Lru(LruPolicy),
            EvictionStrategy::LFU => Self::Lfu(LfuPolicy),
        }
    }

    #[inline(always)]
    pub fn compute_score(&self, record: &CachedResponse) -> f64 {
        match self {
            Self::Lru(p) => p.compute_score(record),
            Self::Lfu(p) => p.compute_score(record),
        }
    }

    pub fn strategy(&self) -> EvictionStrategy {
        match self {
            Self::Lru(_) => EvictionStrategy::LRU,
            Self::Lfu(_) => EvictionStrategy::LFU,
        }
    }
}
