use std::net::{SocketAddr, UdpSocket};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::{Inbound, SessionStream};

/// Default size of the datagram receive buffer: 64 KiB.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// UDP transport.
///
/// Every received datagram becomes one inbound session. The receive buffer is
/// reused between datagrams, so each payload is copied out before it is handed
/// to a session.
pub struct UdpSessionListener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buf: Vec<u8>,
}

impl UdpSessionListener {
    /// Bind on `addr` (`[host]:port`) with the default read buffer size.
    pub fn bind(addr: &str) -> Result<Self> {
        Self::bind_with_buffer(addr, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Bind on `addr` with an explicit read buffer size.
    ///
    /// Datagrams larger than the buffer are truncated by the kernel.
    pub fn bind_with_buffer(addr: &str, read_buffer_size: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let local_addr = socket.local_addr().map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

        debug!(%local_addr, read_buffer_size, "udp socket bound");

        Ok(Self {
            socket,
            local_addr,
            buf: vec![0u8; read_buffer_size.max(1)],
        })
    }

    /// Receive the next datagram (blocking).
    pub fn receive(&mut self) -> Result<Inbound> {
        let (n, peer) = self
            .socket
            .recv_from(&mut self.buf)
            .map_err(TransportError::Receive)?;
        debug!(%peer, bytes = n, "received datagram");
        let payload = Bytes::copy_from_slice(&self.buf[..n]);
        Ok(Inbound {
            peer,
            stream: SessionStream::from_datagram(payload),
        })
    }

    /// The address this socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Size of the reusable receive buffer.
    pub fn read_buffer_size(&self) -> usize {
        self.buf.len()
    }
}
