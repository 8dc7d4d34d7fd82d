use super::super::key::CacheKey;
use std::cmp::Ordering;

/// Eviction candidate. Orders ascending by score, then by last access, so
/// the first candidates after sorting are the ones to drop.
#[derive(Clone, Debug)]
pub struct EvictionEntry {
    pub key: CacheKey,
    pub score: f64,
    pub last_access: u64,
}

impl PartialEq for EvictionEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvictionEntry {}

impl PartialOrd for EvictionEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.last_access.cmp(&other.last_access))
    }
}
