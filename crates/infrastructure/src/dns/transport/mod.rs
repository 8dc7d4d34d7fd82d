pub mod failover;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use dnsrelay_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

pub use failover::FailoverTransport;
pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Bytes,
    pub server: SocketAddr,
    pub protocol_used: &'static str,
}

/// One upstream server reachable over one protocol.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn server_addr(&self) -> SocketAddr;

    fn protocol_name(&self) -> &'static str;
}
