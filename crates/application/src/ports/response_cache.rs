use bytes::Bytes;
use dnsrelay_domain::Question;

/// A cached upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedReply {
    /// Reply exactly as received upstream; the transaction ID is the one of
    /// the query that populated the entry.
    pub bytes: Bytes,
    pub remaining_ttl: u32,
}

/// Port for the reply cache consulted before forwarding.
pub trait ResponseCache: Send + Sync {
    /// Looks up `question`. Implementations may match the name without regard
    /// to ASCII case; the stored question is then spelled as in the query that
    /// populated the entry.
    fn get(&self, question: &Question) -> Option<CachedReply>;

    /// Stores `reply` for `ttl` seconds. A `ttl` of 0 must not be stored.
    fn insert(&self, question: &Question, reply: Bytes, ttl: u32);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry, returning how many were removed.
    fn remove_expired(&self) -> usize;
}
