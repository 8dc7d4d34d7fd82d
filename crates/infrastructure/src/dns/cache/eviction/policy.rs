use crate::dns::cache::record::CachedResponse;

/// Scores cache entries for eviction. Lower scores are evicted first.
pub trait EvictionPolicy: Send + Sync {
    fn compute_score(&self, record: &CachedResponse) -> f64;
}
