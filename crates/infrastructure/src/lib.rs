//! DNS Relay Infrastructure Layer
//!
//! Adapters for the application ports: the UDP upstream transports, the
//! reply cache and the tracing observer, plus the cache maintenance jobs.
pub mod dns;
pub mod jobs;
