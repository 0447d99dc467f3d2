/// Errors that can occur in listener operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to accept an incoming TCP connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// Failed to receive a UDP datagram.
    #[error("failed to receive datagram: {0}")]
    Receive(std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
