//! Receive raw bytes over TCP or UDP and persist them.
//!
//! netsink listens on one address, accepts any number of concurrent senders
//! and writes what they send to standard output or to files named per
//! session by a template such as `out-{{.Id}}-{{.Ip}}-{{.Port}}.log`.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP and UDP listeners
//! - [`frame`] — gzip auto-detection and line/chunk framing
//! - [`output`] — naming templates and cached output destinations
//! - [`server`] — session dispatch, serialization gate and transfer loop

/// Re-export transport types.
pub mod transport {
    pub use netsink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use netsink_frame::*;
}

/// Re-export output types.
pub mod output {
    pub use netsink_output::*;
}

/// Re-export server types.
pub mod server {
    pub use netsink_server::*;
}

pub use netsink_server::{Server, ServerConfig, ServerError};
