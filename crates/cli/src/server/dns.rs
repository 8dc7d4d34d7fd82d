use dnsrelay_application::use_cases::{RelayOutcome, RelayQueryUseCase};
use dnsrelay_domain::config::ServerConfig;
use dnsrelay_domain::DomainError;
use dnsrelay_infrastructure::dns::transport::udp::MAX_UDP_RESPONSE_SIZE;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Binds the listener and serves client datagrams until `shutdown` is
/// cancelled.
pub async fn start_dns_server(
    config: ServerConfig,
    relay: Arc<RelayQueryUseCase>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.listen_address().parse()?;
    let socket = Arc::new(create_udp_socket(socket_addr, config.recv_buffer_size)?);

    info!(
        bind_address = %socket_addr,
        max_datagram_size = config.max_datagram_size,
        "DNS relay listening"
    );

    serve(socket, config.max_datagram_size, relay, shutdown).await;
    Ok(())
}

/// Receive loop. Every accepted datagram is relayed on its own task so a slow
/// upstream never blocks the loop.
///
/// The receive buffer is always larger than `max_datagram_size`, so an
/// oversized datagram is seen whole and rejected instead of being cut short.
async fn serve(
    socket: Arc<UdpSocket>,
    max_datagram_size: usize,
    relay: Arc<RelayQueryUseCase>,
    shutdown: CancellationToken,
) {
    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE.max(max_datagram_size.saturating_add(1))];

    loop {
        let (n, client) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS server: shutting down");
                break;
            }
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) => {
                    // ICMP port unreachable from an earlier send surfaces here on some platforms.
                    debug!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        if n > max_datagram_size {
            warn!(
                %client,
                size = n,
                max_datagram_size,
                "Dropping oversized datagram"
            );
            continue;
        }

        let datagram = recv_buf[..n].to_vec();
        let relay = Arc::clone(&relay);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            match relay.execute(&datagram, client).await {
                Ok(outcome) => deliver(&socket, outcome).await,
                Err(e) => log_relay_error(client, &e),
            }
        });
    }
}

async fn deliver(socket: &UdpSocket, outcome: RelayOutcome) {
    for delivery in outcome.deliveries {
        if let Err(e) = socket.send_to(&delivery.bytes, delivery.client).await {
            warn!(client = %delivery.client, error = %e, "Failed to send reply");
        }
    }
}

fn log_relay_error(client: SocketAddr, error: &DomainError) {
    if error.is_transport_error() {
        warn!(%client, error = %error, "Upstream round trip failed");
    } else {
        debug!(%client, error = %error, "Query dropped");
    }
}

fn create_udp_socket(socket_addr: SocketAddr, recv_buffer_size: usize) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    if let Err(e) = socket.set_recv_buffer_size(recv_buffer_size) {
        error!(error = %e, recv_buffer_size, "Failed to set receive buffer size");
    }
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsrelay_domain::UpstreamEndpoint;
    use dnsrelay_infrastructure::dns::{FailoverTransport, TracingMessageObserver};
    use std::time::Duration;

    fn query(id: u16) -> Vec<u8> {
        let mut out = id.to_be_bytes().to_vec();
        out.extend_from_slice(&[0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(b"\x07example\x03com\x00");
        out.extend_from_slice(&[0, 1, 0, 1]);
        out
    }

    async fn start(max_datagram_size: usize) -> (SocketAddr, UdpSocket, CancellationToken) {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = FailoverTransport::from_endpoints(
            &[UpstreamEndpoint::new(upstream.local_addr().unwrap())],
            Duration::from_millis(200),
        );
        let relay = Arc::new(RelayQueryUseCase::new(
            Arc::new(transport),
            Arc::new(TracingMessageObserver::new(false)),
        ));

        let listener = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let listen_addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        tokio::spawn(serve(listener, max_datagram_size, relay, shutdown.clone()));
        (listen_addr, upstream, shutdown)
    }

    #[tokio::test]
    async fn test_oversized_datagram_is_not_forwarded() {
        let (listen_addr, upstream, shutdown) = start(512).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut oversized = query(1);
        oversized.resize(600, 0);
        client.send_to(&oversized, listen_addr).await.unwrap();
        let accepted = query(2);
        client.send_to(&accepted, listen_addr).await.unwrap();

        let mut buf = [0u8; 1024];
        let (n, _) = tokio::time::timeout(Duration::from_secs(2), upstream.recv_from(&mut buf))
            .await
            .expect("nothing forwarded")
            .unwrap();
        assert_eq!(&buf[..n], accepted.as_slice());
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_datagram_above_classic_limit_is_received_whole() {
        let (listen_addr, upstream, shutdown) = start(1232).await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut large = query(3);
        large.resize(900, 0);
        client.send_to(&large, listen_addr).await.unwrap();

        let mut buf = [0u8; 2048];
        let (n, _) = tokio::time::timeout(Duration::from_secs(2), upstream.recv_from(&mut buf))
            .await
            .expect("nothing forwarded")
            .unwrap();
        assert_eq!(n, 900);
        shutdown.cancel();
    }
}
