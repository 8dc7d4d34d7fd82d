use super::policy::EvictionPolicy;
use crate::dns::cache::record::CachedResponse;

/// Score = hit count. Ties are broken by recency in [`super::EvictionEntry`].
pub struct LfuPolicy;

impl EvictionPolicy for LfuPolicy {
    fn compute_score(&self, record: &CachedResponse) -> f64 {
        record.hits() as f64
    }
}
