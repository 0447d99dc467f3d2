use netsink_frame::{FrameConfig, FrameMode, DEFAULT_MAX_LINE_LENGTH};
use netsink_transport::{TransportKind, DEFAULT_READ_BUFFER_SIZE};

/// Validated listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening address, `[host]:port`.
    pub address: String,
    /// Naming template for output files; `None` writes to standard output.
    pub output_pattern: Option<String>,
    /// Decompress sessions that start with a gzip header.
    pub gzip: bool,
    /// Append to existing files instead of truncating them on first open.
    pub append: bool,
    /// Run sessions one at a time, in arrival order.
    pub serialize: bool,
    /// Line or chunk framing.
    pub frame_mode: FrameMode,
    /// TCP or UDP.
    pub transport: TransportKind,
    /// Datagram receive buffer size (UDP only).
    pub udp_read_buffer_size: usize,
    /// Longest accepted line, terminator included (line mode only).
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            output_pattern: None,
            gzip: false,
            append: false,
            serialize: false,
            frame_mode: FrameMode::Line,
            transport: TransportKind::Tcp,
            udp_read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Defaults listening on `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_output_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.output_pattern = Some(pattern.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_frame_mode(mut self, mode: FrameMode) -> Self {
        self.frame_mode = mode;
        self
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_serialize(mut self, serialize: bool) -> Self {
        self.serialize = serialize;
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn with_udp_read_buffer_size(mut self, size: usize) -> Self {
        self.udp_read_buffer_size = size;
        self
    }

    /// Decoder settings derived from this configuration.
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            mode: self.frame_mode,
            detect_gzip: self.gzip,
            max_line_length: self.max_line_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ServerConfig::new("127.0.0.1:9000");
        assert_eq!(cfg.address, "127.0.0.1:9000");
        assert!(cfg.output_pattern.is_none());
        assert_eq!(cfg.transport, TransportKind::Tcp);
        assert_eq!(cfg.frame_mode, FrameMode::Line);
        assert_eq!(cfg.udp_read_buffer_size, 64 * 1024);
        assert!(!cfg.gzip && !cfg.append && !cfg.serialize);
    }

    #[test]
    fn frame_config_follows_settings() {
        let cfg = ServerConfig::new(":0")
            .with_frame_mode(FrameMode::Chunk)
            .with_gzip(true)
            .with_max_line_length(128);
        let frame = cfg.frame_config();
        assert_eq!(frame.mode, FrameMode::Chunk);
        assert!(frame.detect_gzip);
        assert_eq!(frame.max_line_length, 128);
    }
}
