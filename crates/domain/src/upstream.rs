use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream resolver queries are forwarded to.
///
/// Accepted forms: `udp://IP:PORT`, `IP:PORT`, `[IPv6]:PORT` or a bare `IP`
/// (port 53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    addr: SocketAddr,
}

impl UpstreamEndpoint {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl From<SocketAddr> for UpstreamEndpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr)
    }
}

impl FromStr for UpstreamEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let addr_str = trimmed.strip_prefix("udp://").unwrap_or(trimmed);

        if let Some(scheme_end) = addr_str.find("://") {
            return Err(format!(
                "Unsupported upstream scheme '{}' in '{}'. Only udp:// is supported",
                &addr_str[..scheme_end],
                s
            ));
        }

        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return Ok(Self::new(addr));
        }
        if let Ok(ip) = addr_str.parse::<IpAddr>() {
            return Ok(Self::new(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        if let Some(inner) = addr_str.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            if let Ok(ip) = inner.parse::<IpAddr>() {
                return Ok(Self::new(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
            }
        }

        Err(format!(
            "Invalid upstream endpoint '{}'. Expected: udp://IP:PORT, IP:PORT or IP",
            s
        ))
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "udp://{}", self.addr)
    }
}
