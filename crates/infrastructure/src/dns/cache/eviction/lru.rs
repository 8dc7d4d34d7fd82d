use super::policy::EvictionPolicy;
use crate::dns::cache::record::CachedResponse;
use std::sync::atomic::Ordering;

pub struct LruPolicy;

impl EvictionPolicy for LruPolicy {
    fn compute_score(&self, record: &CachedResponse) -> f64 {
        record.last_access.load(Ordering::Relaxed) as f64
    }
}
