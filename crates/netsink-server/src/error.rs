/// Errors that stop the listener.
///
/// Per-session read and write failures never appear here; they are reported
/// in the session's [`TransferReport`](crate::TransferReport).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding, accepting or receiving failed.
    #[error("transport error: {0}")]
    Transport(#[from] netsink_transport::TransportError),

    /// The naming template is malformed.
    #[error("invalid naming template: {0}")]
    Template(#[from] netsink_output::TemplateError),

    /// A session's destination could not be resolved or opened.
    #[error("destination error: {0}")]
    Resolve(#[from] netsink_output::ResolveError),

    /// The session handler thread could not be started.
    #[error("failed to spawn session handler: {0}")]
    Spawn(std::io::Error),
}

/// Errors that end a single session's transfer.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Reading or decoding the session's stream failed.
    #[error("read error: {0}")]
    Read(#[from] netsink_frame::FrameError),

    /// Writing to the destination failed.
    #[error("write error: {0}")]
    Write(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
