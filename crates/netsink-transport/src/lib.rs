//! Listening transports for netsink.
//!
//! Provides a uniform "next inbound session" interface over:
//! - TCP, where each accepted connection is one session
//! - UDP, where each received datagram is one session
//!
//! This is the lowest layer of netsink. Everything else builds on top of
//! the [`Inbound`] values produced here.

pub mod error;
pub mod listener;
pub mod stream;
pub mod tcp;
pub mod udp;

pub use error::{Result, TransportError};
pub use listener::{SessionListener, TransportKind};
pub use stream::{Inbound, SessionStream};
pub use tcp::TcpSessionListener;
pub use udp::{UdpSessionListener, DEFAULT_READ_BUFFER_SIZE};
