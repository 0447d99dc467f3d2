use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::error::{FrameError, Result};
use crate::gzip::DecodedStream;
use crate::lines::LineReader;

/// Default upper bound on a single line: half the addressable size.
pub const DEFAULT_MAX_LINE_LENGTH: usize = isize::MAX as usize / 2;

/// Chunk size used for raw copying: 64 KiB.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// How a decoded stream is split into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    /// Newline-terminated lines; the unit count is a line count.
    #[default]
    Line,
    /// Opaque chunks of up to [`CHUNK_SIZE`] bytes; the unit of volume is bytes.
    Chunk,
}

impl FrameMode {
    /// Name of the unit counted in this mode.
    pub fn unit_name(self) -> &'static str {
        match self {
            FrameMode::Line => "lines",
            FrameMode::Chunk => "bytes",
        }
    }
}

/// Frame decoder configuration.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Framing mode.
    pub mode: FrameMode,
    /// Peek for a gzip header and decompress when found.
    pub detect_gzip: bool,
    /// Maximum line length in bytes (line mode only).
    pub max_line_length: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            mode: FrameMode::Line,
            detect_gzip: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Turns a session's raw byte source into a sequence of units.
pub struct FrameDecoder<R: Read> {
    inner: FrameDecoderInner<R>,
    compressed: bool,
}

enum FrameDecoderInner<R: Read> {
    Lines(LineReader<DecodedStream<R>>),
    Chunks {
        source: DecodedStream<R>,
        buf: Box<[u8]>,
    },
}

impl<R: Read> FrameDecoder<R> {
    /// Wrap `source`, running gzip detection first when configured.
    ///
    /// Detection blocks until the header prefix has been read or the stream
    /// ends; an I/O error during detection is returned here.
    pub fn new(source: R, config: &FrameConfig) -> Result<Self> {
        let decoded = if config.detect_gzip {
            DecodedStream::detect(source)?
        } else {
            DecodedStream::plain(source)
        };
        let compressed = decoded.is_compressed();

        let inner = match config.mode {
            FrameMode::Line => {
                FrameDecoderInner::Lines(LineReader::new(decoded, config.max_line_length))
            }
            FrameMode::Chunk => FrameDecoderInner::Chunks {
                source: decoded,
                buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            },
        };
        Ok(Self { inner, compressed })
    }

    /// Read the next unit (blocking). `Ok(None)` marks end of stream.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        match &mut self.inner {
            FrameDecoderInner::Lines(reader) => reader.read_line(),
            // The buffer is reused, so each chunk is copied out of it.
            FrameDecoderInner::Chunks { source, buf } => loop {
                let read = match source.read(buf) {
                    Ok(n) => n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(FrameError::Io(err)),
                };
                if read == 0 {
                    return Ok(None);
                }
                return Ok(Some(Bytes::copy_from_slice(&buf[..read])));
            },
        }
    }

    pub fn mode(&self) -> FrameMode {
        match self.inner {
            FrameDecoderInner::Lines(_) => FrameMode::Line,
            FrameDecoderInner::Chunks { .. } => FrameMode::Chunk,
        }
    }

    /// Whether the stream was detected as gzip and is being decompressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}
