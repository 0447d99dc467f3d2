use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Splits any `Read` stream into newline-terminated lines.
///
/// Each line keeps its trailing `\n`. Trailing bytes without a terminator are
/// returned as a final partial line at end of stream, so concatenating every
/// line reproduces the input exactly.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    scanned: usize,
    max_line_length: usize,
    eof: bool,
}

impl<T: Read> LineReader<T> {
    /// Create a line reader that rejects lines longer than `max_line_length`
    /// bytes, terminator included.
    pub fn new(inner: T, max_line_length: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            scanned: 0,
            max_line_length,
            eof: false,
        }
    }

    /// Read the next line (blocking).
    ///
    /// Returns `Ok(None)` once the stream is exhausted.
    pub fn read_line(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(pos) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
                let end = self.scanned + pos + 1;
                if end > self.max_line_length {
                    return Err(self.too_long());
                }
                self.scanned = 0;
                return Ok(Some(self.buf.split_to(end).freeze()));
            }
            self.scanned = self.buf.len();

            if self.buf.len() > self.max_line_length {
                return Err(self.too_long());
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                self.scanned = 0;
                return Ok(Some(self.buf.split().freeze()));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&chunk[..read]);
            }
        }
    }

    /// Maximum accepted line length in bytes.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn too_long(&self) -> FrameError {
        FrameError::LineTooLong {
            max: self.max_line_length,
        }
    }
}
