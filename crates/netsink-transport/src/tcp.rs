use std::net::{SocketAddr, TcpListener};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::{Inbound, SessionStream};

/// TCP transport.
///
/// Every accepted connection becomes one inbound session whose byte source is
/// the connection itself. The connection is closed when the session's stream
/// is dropped.
pub struct TcpSessionListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpSessionListener {
    /// Bind and listen on `addr` (`[host]:port`).
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let local_addr = listener.local_addr().map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

        debug!(%local_addr, "tcp socket bound");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept the next connection (blocking).
    pub fn accept(&self) -> Result<Inbound> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(Inbound {
            peer,
            stream: SessionStream::from_tcp(stream),
        })
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
