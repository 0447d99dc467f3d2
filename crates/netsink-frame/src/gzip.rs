//! Gzip auto-detection.
//!
//! The first [`GZIP_HEADER_LEN`] bytes of a session are peeked. If they form a
//! gzip member header the stream is decompressed, otherwise the bytes are
//! replayed untouched.

use std::io::Read;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::peek::PeekReader;

/// Size of the fixed gzip member header.
pub const GZIP_HEADER_LEN: usize = 10;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const METHOD_DEFLATE: u8 = 8;
const RESERVED_FLAGS: u8 = 0xe0;

/// Whether `prefix` is a complete, well-formed gzip member header.
pub fn is_gzip_header(prefix: &[u8]) -> bool {
    prefix.len() >= GZIP_HEADER_LEN
        && prefix[0..2] == GZIP_MAGIC
        && prefix[2] == METHOD_DEFLATE
        && prefix[3] & RESERVED_FLAGS == 0
}

/// A session byte stream after optional decompression.
pub struct DecodedStream<R: Read> {
    inner: DecodedStreamInner<R>,
}

enum DecodedStreamInner<R: Read> {
    Plain(PeekReader<R>),
    Gzip(MultiGzDecoder<PeekReader<R>>),
}

impl<R: Read> DecodedStream<R> {
    /// Pass the stream through unchanged.
    pub fn plain(inner: R) -> Self {
        Self {
            inner: DecodedStreamInner::Plain(PeekReader::new(inner)),
        }
    }

    /// Peek the stream's header and decompress it if it is gzip.
    ///
    /// Concatenated gzip members decode as a single stream.
    pub fn detect(inner: R) -> std::io::Result<Self> {
        let mut reader = PeekReader::new(inner);
        let compressed = is_gzip_header(reader.peek(GZIP_HEADER_LEN)?);
        debug!(compressed, "gzip detection");
        let inner = if compressed {
            DecodedStreamInner::Gzip(MultiGzDecoder::new(reader))
        } else {
            DecodedStreamInner::Plain(reader)
        };
        Ok(Self { inner })
    }

    /// Whether the stream is being decompressed.
    pub fn is_compressed(&self) -> bool {
        matches!(self.inner, DecodedStreamInner::Gzip(_))
    }
}

impl<R: Read> Read for DecodedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            DecodedStreamInner::Plain(reader) => reader.read(buf),
            DecodedStreamInner::Gzip(decoder) => decoder.read(buf),
        }
    }
}
