use crate::wire::Section;
use thiserror::Error;

/// Failure while decoding a wire-format DNS message.
///
/// Every variant carries the offset at which decoding stopped and, where it
/// applies, how many octets were actually available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Message shorter than the 12-byte header: {available} bytes")]
    ShortHeader { available: usize },

    #[error("Read of {width} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfBounds {
        offset: usize,
        width: usize,
        available: usize,
    },

    #[error("Domain name truncated at offset {offset} (buffer is {available} bytes)")]
    TruncatedName { offset: usize, available: usize },

    #[error("Record data at offset {offset} declares {rdlength} bytes, only {available} available")]
    TruncatedRecord {
        offset: usize,
        rdlength: usize,
        available: usize,
    },

    #[error("{section} record #{index} starts at offset {offset}, past the {available}-byte datagram")]
    SectionOverrun {
        section: Section,
        index: u16,
        offset: usize,
        available: usize,
    },

    #[error("Invalid compression pointer at offset {offset} targeting {target} (hop {hops})")]
    CompressionLoop {
        offset: usize,
        target: usize,
        hops: usize,
    },

    #[error("Domain name exceeds 255 octets ({length} octets)")]
    NameTooLong { length: usize },

    #[error("Unsupported label type 0x{octet:02x} at offset {offset}")]
    UnsupportedLabelType { offset: usize, octet: u8 },
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    Decode(#[from] DecodeError),

    #[error("Datagram is a response, not a query")]
    NotAQuery,

    #[error("Upstream reply does not answer the forwarded question")]
    UpstreamReplyMismatch,

    #[error("DNS ID mismatch: expected {expected:#06x}, received {received:#06x}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport error with {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("No upstream servers configured")]
    TransportNoServers,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Maps an I/O failure against `server` to the matching transport variant.
    pub fn from_io(server: impl ToString, error: &std::io::Error) -> Self {
        let server = server.to_string();
        match error.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                DomainError::TransportTimeout { server }
            }
            std::io::ErrorKind::ConnectionRefused => {
                DomainError::TransportConnectionRefused { server }
            }
            std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                DomainError::TransportConnectionReset { server }
            }
            _ => DomainError::Transport {
                server,
                reason: error.to_string(),
            },
        }
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::Transport { .. }
                | DomainError::TransportAllServersUnreachable
                | DomainError::TransportNoServers
                | DomainError::ResponseIdMismatch { .. }
        )
    }
}
