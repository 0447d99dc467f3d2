//! Session dispatch for netsink.
//!
//! This is the layer that ties the others together. A [`Server`] accepts
//! TCP connections or UDP datagrams, numbers them, resolves each one's output
//! destination and runs it on its own thread through the frame decoder and
//! [`run_session`].
//!
//! # Ordering
//!
//! With [`ServerConfig::serialize`] set, sessions run one at a time in arrival
//! order, so writes from different senders never interleave. Without it,
//! sessions run concurrently and writes from sessions sharing one destination
//! may interleave at any granularity; line and chunk boundaries are not
//! synchronization points.
//!
//! # Failure model
//!
//! Bind, accept and receive failures, template errors and destination open
//! failures are fatal and returned from [`Server::bind`] or [`Server::run`].
//! Read and write failures inside a session only end that session. There are
//! no timeouts: a sender that never closes its stream holds its handler (and,
//! when serialized, every later session) indefinitely.

pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod server;
pub mod session;
pub mod transfer;

pub use config::ServerConfig;
pub use context::SinkContext;
pub use error::{Result, ServerError, TransferError};
pub use gate::{GateGuard, SerializationGate, Ticket};
pub use server::Server;
pub use session::Session;
pub use transfer::{run_session, TransferReport};
