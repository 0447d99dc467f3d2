use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use netsink_output::TemplateBinding;
use netsink_transport::{SessionListener, TransportKind};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::context::SinkContext;
use crate::error::{Result, ServerError};
use crate::session::Session;
use crate::transfer::{run_session, TransferReport};

/// Accepts sessions and hands each one to its own handler thread.
///
/// The accept/receive loop is single-threaded. For every session it assigns
/// the sequence id, resolves the destination and draws a gate ticket before
/// spawning, so resolution errors surface here and arrival order is fixed.
pub struct Server {
    listener: SessionListener,
    context: Arc<SinkContext>,
}

impl Server {
    /// Validate the naming template, then bind the listener.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let context = SinkContext::new(config)?;
        let listener = SessionListener::bind(
            config.transport,
            &config.address,
            config.udp_read_buffer_size,
        )?;
        info!("Listening on {}", listener.local_addr());

        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    /// Accept one session and start its handler.
    ///
    /// The returned handle yields the session's report; dropping it detaches
    /// the handler.
    pub fn dispatch_next(&mut self) -> Result<JoinHandle<TransferReport>> {
        let inbound = self.listener.next_inbound()?;
        let id = self.context.next_id();
        let session = Session::from_inbound(id, inbound);

        let mut output = self
            .context
            .resolver()
            .resolve(&TemplateBinding::new(id, session.peer))?;
        let ticket = self.context.gate().ticket();
        debug!(id, peer = %session.peer, output = %output, "dispatching session");

        let context = Arc::clone(&self.context);
        std::thread::Builder::new()
            .name(format!("netsink-session-{id}"))
            .spawn(move || {
                let _guard = ticket.enter();
                run_session(session, &mut output, context.frame_config())
            })
            .map_err(ServerError::Spawn)
    }

    /// Dispatch sessions until a fatal error occurs.
    pub fn run(mut self) -> Result<Infallible> {
        loop {
            drop(self.dispatch_next()?);
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn transport(&self) -> TransportKind {
        self.listener.kind()
    }

    /// Shared state: sequence counter, resolver and gate.
    pub fn context(&self) -> &SinkContext {
        &self.context
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("listener", &self.listener)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::{Shutdown, TcpStream, UdpSocket};
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use netsink_frame::FrameMode;

    use super::*;

    fn pattern_in(dir: &Path, pattern: &str) -> String {
        format!("{}/{pattern}", dir.display())
    }

    fn send_tcp(addr: SocketAddr, payload: &[u8]) {
        let mut stream = TcpStream::connect(addr).expect("client should connect");
        stream.write_all(payload).expect("client should write");
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn tcp_sessions_write_to_templated_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "out-{{.Id}}-{{.Ip}}.txt"));
        let mut server = Server::bind(&cfg).expect("server should bind");
        assert_eq!(server.transport(), TransportKind::Tcp);
        let addr = server.local_addr();

        send_tcp(addr, b"first session\n");
        let first = server.dispatch_next().unwrap().join().unwrap();
        send_tcp(addr, b"second session\n");
        let second = server.dispatch_next().unwrap().join().unwrap();

        assert_eq!((first.id, second.id), (1, 2));
        assert!(first.is_complete() && second.is_complete());
        assert_eq!(
            std::fs::read(dir.path().join("out-1-127.0.0.1.txt")).unwrap(),
            b"first session\n"
        );
        assert_eq!(
            std::fs::read(dir.path().join("out-2-127.0.0.1.txt")).unwrap(),
            b"second session\n"
        );
    }

    #[test]
    fn literal_pattern_shares_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "all.log"))
            .with_serialize(true);
        let mut server = Server::bind(&cfg).unwrap();
        let addr = server.local_addr();

        let mut handles = Vec::new();
        for i in 0..3 {
            send_tcp(addr, format!("line {i}\n").as_bytes());
            handles.push(server.dispatch_next().unwrap());
        }
        for handle in handles {
            assert!(handle.join().unwrap().is_complete());
        }

        assert_eq!(server.context().resolver().open_count(), 1);
        assert_eq!(
            std::fs::read(dir.path().join("all.log")).unwrap(),
            b"line 0\nline 1\nline 2\n"
        );
    }

    #[test]
    fn serialized_sessions_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "ordered.log"))
            .with_serialize(true);
        let mut server = Server::bind(&cfg).unwrap();
        let addr = server.local_addr();

        // S1 stays open while S2 arrives and finishes sending.
        let mut s1 = TcpStream::connect(addr).unwrap();
        s1.write_all(b"s1 part one\n").unwrap();
        let h1 = server.dispatch_next().unwrap();

        send_tcp(addr, b"s2 only line\n");
        let h2 = server.dispatch_next().unwrap();

        thread::sleep(Duration::from_millis(100));
        s1.write_all(b"s1 part two\n").unwrap();
        s1.shutdown(Shutdown::Write).unwrap();
        drop(s1);

        let r1 = h1.join().unwrap();
        let r2 = h2.join().unwrap();
        assert_eq!((r1.units, r2.units), (2, 1));
        assert_eq!(
            std::fs::read(dir.path().join("ordered.log")).unwrap(),
            b"s1 part one\ns1 part two\ns2 only line\n"
        );
    }

    #[test]
    fn oversized_line_abandons_only_that_session() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "{{.Id}}.log"))
            .with_max_line_length(16);
        let mut server = Server::bind(&cfg).unwrap();
        let addr = server.local_addr();

        send_tcp(addr, b"fine\n");
        let before = server.dispatch_next().unwrap().join().unwrap();
        send_tcp(addr, b"this line is far longer than sixteen bytes\n");
        let broken = server.dispatch_next().unwrap().join().unwrap();
        send_tcp(addr, b"still listening\n");
        let after = server.dispatch_next().unwrap().join().unwrap();

        assert!(before.is_complete());
        assert!(broken.error.as_deref().unwrap_or("").contains("line too long"));
        assert!(after.is_complete());
        assert_eq!(after.id, 3);
        assert_eq!(
            std::fs::read(dir.path().join("3.log")).unwrap(),
            b"still listening\n"
        );
    }

    #[test]
    fn chunk_mode_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "blob.bin"))
            .with_frame_mode(FrameMode::Chunk);
        let mut server = Server::bind(&cfg).unwrap();

        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 256) as u8).collect();
        let addr = server.local_addr();
        let sender = {
            let payload = payload.clone();
            thread::spawn(move || send_tcp(addr, &payload))
        };
        let report = server.dispatch_next().unwrap().join().unwrap();
        sender.join().unwrap();

        assert_eq!(report.volume(), payload.len() as u64);
        assert_eq!(std::fs::read(dir.path().join("blob.bin")).unwrap(), payload);
    }

    #[test]
    fn tcp_gzip_session_is_decompressed() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "{{.Id}}.log"))
            .with_gzip(true);
        let mut server = Server::bind(&cfg).unwrap();
        let addr = server.local_addr();

        send_tcp(addr, &gzip(b"compressed\nlines\n"));
        server.dispatch_next().unwrap().join().unwrap();
        send_tcp(addr, b"compressed\nlines\n");
        server.dispatch_next().unwrap().join().unwrap();

        let one = std::fs::read(dir.path().join("1.log")).unwrap();
        let two = std::fs::read(dir.path().join("2.log")).unwrap();
        assert_eq!(one, b"compressed\nlines\n");
        assert_eq!(one, two);
    }

    #[test]
    fn udp_datagrams_are_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_transport(TransportKind::Udp)
            .with_output_pattern(pattern_in(dir.path(), "udp-{{.Id}}-{{.Port}}.log"))
            .with_gzip(true);
        let mut server = Server::bind(&cfg).unwrap();
        assert_eq!(server.transport(), TransportKind::Udp);

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = client.local_addr().unwrap().port();
        client.send_to(b"plain\n", server.local_addr()).unwrap();
        client
            .send_to(&gzip(b"zipped\n"), server.local_addr())
            .unwrap();

        let first = server.dispatch_next().unwrap();
        let second = server.dispatch_next().unwrap();
        assert!(first.join().unwrap().is_complete());
        assert!(second.join().unwrap().is_complete());

        assert_eq!(
            std::fs::read(dir.path().join(format!("udp-1-{port}.log"))).unwrap(),
            b"plain\n"
        );
        assert_eq!(
            std::fs::read(dir.path().join(format!("udp-2-{port}.log"))).unwrap(),
            b"zipped\n"
        );
    }

    #[test]
    fn invalid_template_fails_before_bind() {
        let cfg = ServerConfig::new("127.0.0.1:0").with_output_pattern("out-{{.Nope}}");
        let err = Server::bind(&cfg).unwrap_err();
        assert!(matches!(err, ServerError::Template(_)));
    }

    #[test]
    fn bind_failure_is_transport_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let cfg = ServerConfig::new(taken.local_addr().unwrap().to_string());
        let err = Server::bind(&cfg).unwrap_err();
        assert!(matches!(err, ServerError::Transport(_)));
    }

    #[test]
    fn unopenable_destination_is_fatal_for_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new("127.0.0.1:0")
            .with_output_pattern(pattern_in(dir.path(), "missing/{{.Id}}.log"));
        let mut server = Server::bind(&cfg).unwrap();

        send_tcp(server.local_addr(), b"nowhere to go\n");
        let err = server.dispatch_next().unwrap_err();
        assert!(matches!(err, ServerError::Resolve(_)));
    }
}
