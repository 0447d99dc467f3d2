use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

/// A reader that can look ahead at a prefix without consuming it.
///
/// Peeked bytes are held in an internal buffer and replayed by [`Read`]
/// before any further bytes are pulled from the inner stream.
pub struct PeekReader<R> {
    inner: R,
    buf: BytesMut,
    eof: bool,
}

impl<R: Read> PeekReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            eof: false,
        }
    }

    /// Return up to `n` bytes from the front of the stream without consuming them.
    ///
    /// Blocks until `n` bytes are buffered or the stream ends, so a shorter
    /// slice means the whole stream is shorter than `n`.
    pub fn peek(&mut self, n: usize) -> std::io::Result<&[u8]> {
        while self.buf.len() < n && !self.eof {
            let mut chunk = vec![0u8; n - self.buf.len()];
            let read = match self.inner.read(&mut chunk) {
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if read == 0 {
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&chunk[..read]);
            }
        }
        let len = self.buf.len().min(n);
        Ok(&self.buf[..len])
    }

    /// Number of peeked bytes not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        if !self.buf.is_empty() {
            let n = self.buf.len().min(out.len());
            out[..n].copy_from_slice(&self.buf[..n]);
            self.buf.advance(n);
            return Ok(n);
        }
        if self.eof {
            return Ok(0);
        }
        self.inner.read(out)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = PeekReader::new(Cursor::new(b"hello world".to_vec()));
        assert_eq!(reader.peek(5).unwrap(), b"hello");
        assert_eq!(reader.peek(5).unwrap(), b"hello");

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn peek_accumulates_partial_reads() {
        let mut reader = PeekReader::new(ByteByByteReader {
            bytes: b"0123456789abc".to_vec(),
            pos: 0,
        });
        assert_eq!(reader.peek(10).unwrap(), b"0123456789");
        assert_eq!(reader.buffered(), 10);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"0123456789abc");
    }

    #[test]
    fn peek_past_end_returns_short_slice() {
        let mut reader = PeekReader::new(Cursor::new(b"abc".to_vec()));
        assert_eq!(reader.peek(10).unwrap(), b"abc");

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn small_reads_drain_peek_buffer_first() {
        let mut reader = PeekReader::new(Cursor::new(b"abcdef".to_vec()));
        reader.peek(4).unwrap();

        let mut two = [0u8; 2];
        reader.read_exact(&mut two).unwrap();
        assert_eq!(&two, b"ab");
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"cdef");
    }

    #[test]
    fn interrupted_peek_retries() {
        struct InterruptedOnce {
            interrupted: bool,
            inner: Cursor<Vec<u8>>,
        }

        impl Read for InterruptedOnce {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.inner.read(buf)
            }
        }

        let mut reader = PeekReader::new(InterruptedOnce {
            interrupted: false,
            inner: Cursor::new(b"data".to_vec()),
        });
        assert_eq!(reader.peek(4).unwrap(), b"data");
    }
}
