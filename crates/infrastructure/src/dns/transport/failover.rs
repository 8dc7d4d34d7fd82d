use super::{DnsTransport, UdpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use dnsrelay_application::ports::UpstreamTransport;
use dnsrelay_domain::{DomainError, UpstreamEndpoint};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Tries each upstream in configured order until one answers.
pub struct FailoverTransport {
    servers: Vec<Arc<dyn DnsTransport>>,
    timeout: Duration,
}

impl FailoverTransport {
    pub fn new(servers: Vec<Arc<dyn DnsTransport>>, timeout: Duration) -> Self {
        Self { servers, timeout }
    }

    pub fn from_endpoints(endpoints: &[UpstreamEndpoint], timeout: Duration) -> Self {
        let servers = endpoints
            .iter()
            .map(|ep| Arc::new(UdpTransport::new(ep.socket_addr())) as Arc<dyn DnsTransport>)
            .collect();
        Self::new(servers, timeout)
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }
}

#[async_trait]
impl UpstreamTransport for FailoverTransport {
    async fn forward(&self, query: &[u8]) -> Result<Bytes, DomainError> {
        if self.servers.is_empty() {
            return Err(DomainError::TransportNoServers);
        }
        debug!(strategy = "failover", servers = self.servers.len(), "Trying sequentially");

        for (index, server) in self.servers.iter().enumerate() {
            match server.send(query, self.timeout).await {
                Ok(response) => {
                    debug!(
                        server = %response.server,
                        protocol = response.protocol_used,
                        position = index,
                        "Server responded"
                    );
                    return Ok(response.bytes);
                }
                Err(e) => {
                    warn!(
                        server = %server.server_addr(),
                        protocol = server.protocol_name(),
                        error = %e,
                        position = index,
                        "Failing over"
                    );
                }
            }
        }
        Err(DomainError::TransportAllServersUnreachable)
    }
}
