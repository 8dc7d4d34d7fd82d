use super::coarse_clock::coarse_now_secs;
use super::eviction::{ActiveEvictionPolicy, EvictionEntry, EvictionStrategy};
use super::key::CacheKey;
use super::metrics::CacheMetrics;
use super::record::CachedResponse;
use bytes::Bytes;
use dashmap::DashMap;
use dnsrelay_application::ports::{CachedReply, ResponseCache};
use dnsrelay_domain::config::CacheConfig;
use dnsrelay_domain::Question;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DnsCacheConfig {
    pub max_entries: usize,
    pub eviction_strategy: EvictionStrategy,
    pub min_ttl: u32,
    pub max_ttl: u32,
    pub batch_eviction_percentage: f64,
    pub shard_amount: usize,
}

impl Default for DnsCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            eviction_strategy: EvictionStrategy::LRU,
            min_ttl: 0,
            max_ttl: 86_400,
            batch_eviction_percentage: 0.1,
            shard_amount: 64,
        }
    }
}

impl From<&CacheConfig> for DnsCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            eviction_strategy: config.eviction_strategy.into(),
            min_ttl: config.min_ttl,
            max_ttl: config.max_ttl,
            batch_eviction_percentage: config.batch_eviction_percentage,
            ..Self::default()
        }
    }
}

/// TTL-bounded reply cache.
///
/// Entries expire by the coarse clock and are removed lazily on lookup or in
/// bulk by [`DnsCache::remove_expired_at`]. When full, expired entries go
/// first, then a batch of the lowest-scored entries under the configured
/// policy.
pub struct DnsCache {
    cache: DashMap<CacheKey, CachedResponse, FxBuildHasher>,
    max_entries: usize,
    eviction_policy: ActiveEvictionPolicy,
    min_ttl: u32,
    max_ttl: u32,
    batch_eviction_percentage: f64,
    access_seq: AtomicU64,
    metrics: Arc<CacheMetrics>,
}

impl DnsCache {
    pub fn new(config: DnsCacheConfig) -> Self {
        let eviction_policy = ActiveEvictionPolicy::from_config(config.eviction_strategy);

        info!(
            max_entries = config.max_entries,
            eviction_strategy = eviction_policy.strategy().as_str(),
            min_ttl = config.min_ttl,
            max_ttl = config.max_ttl,
            "Initializing DNS cache"
        );

        // shard_amount must be a power of two greater than one
        let shard_amount = config.shard_amount.max(2).next_power_of_two();
        let cache = DashMap::with_capacity_and_hasher_and_shard_amount(
            config.max_entries.min(65_536),
            FxBuildHasher,
            shard_amount,
        );

        Self {
            cache,
            max_entries: config.max_entries.max(1),
            eviction_policy,
            min_ttl: config.min_ttl,
            max_ttl: config.max_ttl.max(config.min_ttl),
            batch_eviction_percentage: config.batch_eviction_percentage,
            access_seq: AtomicU64::new(0),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn strategy(&self) -> EvictionStrategy {
        self.eviction_policy.strategy()
    }

    /// Clamped TTL for an upstream TTL, or `None` if it must not be stored.
    pub fn effective_ttl(&self, ttl: u32) -> Option<u32> {
        if ttl == 0 {
            return None;
        }
        Some(ttl.clamp(self.min_ttl, self.max_ttl)).filter(|&t| t > 0)
    }

    fn next_seq(&self) -> u64 {
        self.access_seq.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    pub fn get_at(&self, question: &Question, now_secs: u64) -> Option<CachedReply> {
        let key = CacheKey::from(question);

        let Some(entry) = self.cache.get(&key) else {
            self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
            return None;
        };

        let record = entry.value();
        if record.is_expired_at(now_secs) {
            drop(entry);
            if self
                .cache
                .remove_if(&key, |_, r| r.is_expired_at(now_secs))
                .is_some()
            {
                self.metrics.expirations.fetch_add(1, AtomicOrdering::Relaxed);
            }
            self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
            return None;
        }

        record.record_hit(self.next_seq());
        self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);

        Some(CachedReply {
            bytes: record.reply.clone(),
            remaining_ttl: record.remaining_ttl(now_secs),
        })
    }

    pub fn insert_at(&self, question: &Question, reply: Bytes, ttl: u32, now_secs: u64) -> bool {
        let Some(ttl) = self.effective_ttl(ttl) else {
            return false;
        };

        let key = CacheKey::from(question);
        if self.cache.len() >= self.max_entries && !self.cache.contains_key(&key) {
            self.make_room(now_secs);
        }

        let record = CachedResponse::new_at(reply, ttl, self.next_seq(), now_secs);
        self.cache.insert(key, record);
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
        true
    }

    /// Removes every entry expired at `now_secs`.
    pub fn remove_expired_at(&self, now_secs: u64) -> usize {
        let before = self.cache.len();
        self.cache.retain(|_, record| !record.is_expired_at(now_secs));
        let removed = before.saturating_sub(self.cache.len());

        if removed > 0 {
            self.metrics
                .expirations
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
        removed
    }

    fn make_room(&self, now_secs: u64) {
        let expired = self.remove_expired_at(now_secs);
        if self.cache.len() < self.max_entries {
            debug!(expired, "Made room by dropping expired entries");
            return;
        }

        let evict_count =
            ((self.max_entries as f64 * self.batch_eviction_percentage) as usize).max(1);
        let mut candidates = self.collect_eviction_candidates();
        candidates.sort_unstable();

        let mut evicted = 0u64;
        for entry in candidates.into_iter().take(evict_count) {
            if self.cache.remove(&entry.key).is_some() {
                evicted += 1;
            }
        }

        self.metrics
            .evictions
            .fetch_add(evicted, AtomicOrdering::Relaxed);
        debug!(
            expired,
            evicted,
            strategy = self.eviction_policy.strategy().as_str(),
            "Batch eviction"
        );
    }

    fn collect_eviction_candidates(&self) -> Vec<EvictionEntry> {
        self.cache
            .iter()
            .map(|entry| {
                let record = entry.value();
                EvictionEntry {
                    key: entry.key().clone(),
                    score: self.eviction_policy.compute_score(record),
                    last_access: record.last_access.load(AtomicOrdering::Relaxed),
                }
            })
            .collect()
    }
}

impl ResponseCache for DnsCache {
    fn get(&self, question: &Question) -> Option<CachedReply> {
        self.get_at(question, coarse_now_secs())
    }

    fn insert(&self, question: &Question, reply: Bytes, ttl: u32) {
        self.insert_at(question, reply, ttl, coarse_now_secs());
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn remove_expired(&self) -> usize {
        self.remove_expired_at(coarse_now_secs())
    }
}
