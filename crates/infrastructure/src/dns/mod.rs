pub mod cache;
pub mod message_observer;
pub mod transport;

pub use cache::{CacheKey, CacheMetrics, CachedResponse, DnsCache, DnsCacheConfig, EvictionStrategy};
pub use message_observer::TracingMessageObserver;
pub use transport::{DnsTransport, FailoverTransport, UdpTransport};
