//! Decoding of inbound byte streams for netsink.
//!
//! A session's raw bytes pass through two optional stages:
//! - gzip auto-detection, which peeks a fixed header and decompresses
//!   transparently when it matches
//! - framing, which splits the decoded bytes into newline-terminated lines or
//!   passes them through as opaque chunks
//!
//! Peeking never loses bytes: a stream that is not gzip is replayed from its
//! first byte.

pub mod decoder;
pub mod error;
pub mod gzip;
pub mod lines;
pub mod peek;

pub use decoder::{FrameConfig, FrameDecoder, FrameMode, CHUNK_SIZE, DEFAULT_MAX_LINE_LENGTH};
pub use error::{FrameError, Result};
pub use gzip::{is_gzip_header, DecodedStream, GZIP_HEADER_LEN};
pub use lines::LineReader;
pub use peek::PeekReader;
