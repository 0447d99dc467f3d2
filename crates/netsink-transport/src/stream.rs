use std::io::{Cursor, Read};
use std::net::{SocketAddr, TcpStream};

use bytes::Bytes;

/// The raw byte source of one inbound session.
///
/// A TCP session reads from its own connection; a UDP session reads from an
/// owned copy of exactly the bytes of one datagram.
pub struct SessionStream {
    inner: SessionStreamInner,
}

enum SessionStreamInner {
    Tcp(TcpStream),
    Datagram(Cursor<Bytes>),
}

impl Read for SessionStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SessionStreamInner::Tcp(stream) => stream.read(buf),
            SessionStreamInner::Datagram(cursor) => cursor.read(buf),
        }
    }
}

impl SessionStream {
    pub(crate) fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: SessionStreamInner::Tcp(stream),
        }
    }

    /// Wrap an already-copied datagram payload.
    pub fn from_datagram(payload: Bytes) -> Self {
        Self {
            inner: SessionStreamInner::Datagram(Cursor::new(payload)),
        }
    }

    /// Whether this stream owns a connection that is closed on drop.
    pub fn is_connection(&self) -> bool {
        matches!(self.inner, SessionStreamInner::Tcp(_))
    }
}

impl std::fmt::Debug for SessionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            SessionStreamInner::Tcp(_) => {
                f.debug_struct("SessionStream").field("type", &"tcp").finish()
            }
            SessionStreamInner::Datagram(cursor) => f
                .debug_struct("SessionStream")
                .field("type", &"datagram")
                .field("len", &cursor.get_ref().len())
                .finish(),
        }
    }
}

/// One inbound connection or datagram, before it is given a sequence id.
#[derive(Debug)]
pub struct Inbound {
    /// Remote address of the sender.
    pub peer: SocketAddr,
    /// Bytes sent by the peer.
    pub stream: SessionStream,
}
