use std::net::SocketAddr;

use netsink_transport::{Inbound, SessionStream};

/// One inbound stream with its sequence id.
///
/// Owned by its handler thread for its whole life and never shared. For TCP,
/// dropping the session closes the connection.
#[derive(Debug)]
pub struct Session<S = SessionStream> {
    /// Sequence id, assigned once in arrival order starting at 1.
    pub id: u64,
    /// Remote address of the sender.
    pub peer: SocketAddr,
    /// Raw bytes sent by the peer.
    pub source: S,
}

impl Session {
    pub fn from_inbound(id: u64, inbound: Inbound) -> Self {
        Self {
            id,
            peer: inbound.peer,
            source: inbound.stream,
        }
    }
}
