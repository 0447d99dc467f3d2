use std::io::{Read, Write};
use std::net::SocketAddr;

use netsink_frame::{FrameConfig, FrameDecoder, FrameMode};
use tracing::{info, warn};

use crate::error::TransferError;
use crate::session::Session;

/// Outcome of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub id: u64,
    pub peer: SocketAddr,
    pub mode: FrameMode,
    /// Units written: lines in line mode, chunks in chunk mode.
    pub units: u64,
    /// Bytes written to the destination.
    pub bytes: u64,
    /// Why the session stopped early, if it did.
    pub error: Option<String>,
}

impl TransferReport {
    /// Volume in the mode's own unit: lines or bytes.
    pub fn volume(&self) -> u64 {
        match self.mode {
            FrameMode::Line => self.units,
            FrameMode::Chunk => self.bytes,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
struct Progress {
    units: u64,
    bytes: u64,
}

/// Drain one session into `output`.
///
/// Read and write errors end the session and are recorded in the report; they
/// never propagate. The output is flushed before returning.
pub fn run_session<R, W>(
    session: Session<R>,
    output: &mut W,
    config: &FrameConfig,
) -> TransferReport
where
    R: Read,
    W: Write,
{
    let Session { id, peer, source } = session;
    info!(%peer, id, "Read data from {peer}");

    let mut progress = Progress::default();
    let result = copy_frames(source, output, config, &mut progress);
    let flushed = output.flush().map_err(TransferError::Write);

    let error = match result.and(flushed) {
        Ok(()) => None,
        Err(err) => {
            match &err {
                TransferError::Read(source) => warn!(%peer, id, "Read error: {source}"),
                TransferError::Write(source) => warn!(%peer, id, "Write error: {source}"),
            }
            Some(err.to_string())
        }
    };

    let report = TransferReport {
        id,
        peer,
        mode: config.mode,
        units: progress.units,
        bytes: progress.bytes,
        error,
    };
    info!(
        %peer,
        id,
        units = report.units,
        bytes = report.bytes,
        "Connection {peer} closed, read {} {}",
        report.mode.unit_name(),
        report.volume()
    );
    report
}

fn copy_frames<R, W>(
    source: R,
    output: &mut W,
    config: &FrameConfig,
    progress: &mut Progress,
) -> Result<(), TransferError>
where
    R: Read,
    W: Write,
{
    let mut decoder = FrameDecoder::new(source, config)?;
    while let Some(frame) = decoder.next_frame()? {
        output.write_all(&frame).map_err(TransferError::Write)?;
        progress.units += 1;
        progress.bytes += frame.len() as u64;
    }
    Ok(())
}
