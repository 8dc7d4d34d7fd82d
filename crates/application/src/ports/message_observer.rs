use dnsrelay_domain::{DecodeError, Message};
use std::fmt;

/// Which side of the relay a datagram came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ClientQuery,
    UpstreamReply,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::ClientQuery => "client_query",
            Direction::UpstreamReply => "upstream_reply",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives every decode result the relay produces.
///
/// Decoding itself has no side effects; tracing and packet dumps happen here,
/// after the fact.
pub trait MessageObserver: Send + Sync {
    fn on_decoded(&self, direction: Direction, message: &Message, raw: &[u8]);

    fn on_rejected(&self, direction: Direction, raw: &[u8], error: &DecodeError);
}
