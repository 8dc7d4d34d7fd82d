use async_trait::async_trait;
use bytes::Bytes;
use dnsrelay_domain::DomainError;

/// Sends a query datagram upstream and returns the reply datagram.
///
/// `query` is forwarded exactly as received from the client; implementations
/// must not re-serialize it.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn forward(&self, query: &[u8]) -> Result<Bytes, DomainError>;
}
