use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};

/// A cached upstream reply and its access counters.
#[derive(Debug)]
pub struct CachedResponse {
    pub reply: Bytes,
    /// TTL after clamping, in seconds.
    pub ttl: u32,
    pub inserted_at_secs: u64,
    pub expires_at_secs: u64,
    pub hit_count: AtomicU64,
    /// Access sequence number; higher means more recently used.
    pub last_access: AtomicU64,
}

impl CachedResponse {
    pub fn new_at(reply: Bytes, ttl: u32, access_seq: u64, now_secs: u64) -> Self {
        Self {
            reply,
            ttl,
            inserted_at_secs: now_secs,
            expires_at_secs: now_secs + u64::from(ttl),
            hit_count: AtomicU64::new(0),
            last_access: AtomicU64::new(access_seq),
        }
    }

    #[inline]
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        now_secs >= self.expires_at_secs
    }

    pub fn remaining_ttl(&self, now_secs: u64) -> u32 {
        u32::try_from(self.expires_at_secs.saturating_sub(now_secs)).unwrap_or(u32::MAX)
    }

    pub fn record_hit(&self, access_seq: u64) {
        self.hit_count.fetch_add(1, Ordering::Relaxed);
        self.last_access.store(access_seq, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }
}
