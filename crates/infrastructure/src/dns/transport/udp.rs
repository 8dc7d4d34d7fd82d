//! UDP transport (RFC 1035 §4.2.1).
//!
//! Queries are sent exactly as received from the client. Replies are accepted
//! only from the queried server and only when they echo the query's
//! transaction ID.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use dnsrelay_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest reply accepted, matching the common EDNS(0) payload size.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    async fn recv_from_server(
        &self,
        socket: &UdpSocket,
        buf: &mut [u8],
    ) -> Result<usize, DomainError> {
        loop {
            let (len, from) = socket
                .recv_from(buf)
                .await
                .map_err(|e| DomainError::from_io(self.server_addr, &e))?;

            if from == self.server_addr {
                return Ok(len);
            }
            warn!(
                expected = %self.server_addr,
                received_from = %from,
                "Ignoring UDP datagram from unexpected source"
            );
        }
    }
}

/// Checks that `response` carries the transaction ID of `query`.
pub fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    let (Some(q), Some(r)) = (query.get(..2), response.get(..2)) else {
        return Err(DomainError::Transport {
            server: server.to_string(),
            reason: "message shorter than the transaction ID".to_string(),
        });
    };

    let expected = u16::from_be_bytes([q[0], q[1]]);
    let received = u16::from_be_bytes([r[0], r[1]]);
    if expected != received {
        return Err(DomainError::ResponseIdMismatch { expected, received });
    }
    Ok(())
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::from_io(self.server_addr, &e))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| DomainError::from_io(self.server_addr, &e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received =
            tokio::time::timeout(timeout, self.recv_from_server(&socket, &mut recv_buf))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: self.server_addr.to_string(),
                })??;

        recv_buf.truncate(bytes_received);
        validate_response_id(message_bytes, &recv_buf, self.server_addr)?;

        debug!(server = %self.server_addr, bytes_received, "UDP response received");

        Ok(TransportResponse {
            bytes: Bytes::from(recv_buf),
            server: self.server_addr,
            protocol_used: "UDP",
        })
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
