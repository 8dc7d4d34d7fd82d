mod message_observer;
mod response_cache;
mod upstream_transport;

pub use message_observer::{Direction, MessageObserver};
pub use response_cache::{CachedReply, ResponseCache};
pub use upstream_transport::UpstreamTransport;
