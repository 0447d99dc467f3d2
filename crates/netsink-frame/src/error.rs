/// Errors that can occur while decoding a session's byte stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A line grew past the configured maximum without a terminator.
    #[error("line too long (max {max} bytes)")]
    LineTooLong { max: usize },

    /// An I/O or decompression error occurred while reading the stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
