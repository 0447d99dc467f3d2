use std::net::SocketAddr;

use tracing::debug;

use crate::error::Result;
use crate::stream::Inbound;
use crate::tcp::TcpSessionListener;
use crate::udp::UdpSessionListener;

/// Which transport the listener speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Tcp => f.write_str("tcp"),
            TransportKind::Udp => f.write_str("udp"),
        }
    }
}

/// A bound listener of either transport, selected once at startup.
pub enum SessionListener {
    Tcp(TcpSessionListener),
    Udp(UdpSessionListener),
}

impl SessionListener {
    /// Bind `addr` with the given transport.
    ///
    /// A host-less `:port` listens on every interface: the IPv6 wildcard,
    /// which is dual-stack on most systems, or the IPv4 wildcard on hosts
    /// without IPv6. `udp_read_buffer_size` is ignored for TCP.
    pub fn bind(kind: TransportKind, addr: &str, udp_read_buffer_size: usize) -> Result<Self> {
        let Some(port) = addr.strip_prefix(':') else {
            return Self::bind_exact(kind, addr, udp_read_buffer_size);
        };

        let dual_stack = format!("[::]:{port}");
        match Self::bind_exact(kind, &dual_stack, udp_read_buffer_size) {
            Ok(listener) => Ok(listener),
            Err(err) => {
                debug!(addr = %dual_stack, error = %err, "ipv6 wildcard bind failed, using ipv4");
                Self::bind_exact(kind, &format!("0.0.0.0:{port}"), udp_read_buffer_size)
            }
        }
    }

    fn bind_exact(kind: TransportKind, addr: &str, udp_read_buffer_size: usize) -> Result<Self> {
        match kind {
            TransportKind::Tcp => TcpSessionListener::bind(addr).map(Self::Tcp),
            TransportKind::Udp => {
                UdpSessionListener::bind_with_buffer(addr, udp_read_buffer_size).map(Self::Udp)
            }
        }
    }

    /// Block until the next connection or datagram arrives.
    pub fn next_inbound(&mut self) -> Result<Inbound> {
        match self {
            SessionListener::Tcp(listener) => listener.accept(),
            SessionListener::Udp(listener) => listener.receive(),
        }
    }

    /// The bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        match self {
            SessionListener::Tcp(listener) => listener.local_addr(),
            SessionListener::Udp(listener) => listener.local_addr(),
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            SessionListener::Tcp(_) => TransportKind::Tcp,
            SessionListener::Udp(_) => TransportKind::Udp,
        }
    }
}

impl std::fmt::Debug for SessionListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionListener")
            .field("kind", &self.kind())
            .field("local_addr", &self.local_addr())
            .finish()
    }
}
