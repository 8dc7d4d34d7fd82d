//! DNS Relay Application Layer
//!
//! The relay flow (decode, cache lookup, coalescing, forwarding, fan-out)
//! expressed against ports. Adapters for the ports live in the
//! infrastructure crate.
pub mod ports;
pub mod services;
pub mod use_cases;
