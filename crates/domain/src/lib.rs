//! DNS Relay Domain Layer
//!
//! Wire-format decoding of DNS messages plus the configuration model shared by
//! the relay crates. Nothing in here performs I/O.
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod upstream;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::{RecordClass, RecordType};
pub use errors::{DecodeError, DomainError};
pub use upstream::UpstreamEndpoint;
pub use wire::{
    Header, Message, Question, RData, RDataDecoder, RDataRegistry, ResourceRecord, ResponseCode,
    Section,
};
