use std::convert::Infallible;

use netsink_frame::FrameMode;
use netsink_server::{Server, ServerConfig};
use netsink_transport::TransportKind;

use crate::cmd::ServeArgs;
use crate::exit::{server_error, CliError, CliResult, USAGE};

/// Bind and serve until a fatal error. Never returns successfully.
pub fn run(args: ServeArgs) -> CliResult<Infallible> {
    let config = build_config(&args)?;
    let server = Server::bind(&config).map_err(|err| server_error("startup failed", err))?;
    server
        .run()
        .map_err(|err| server_error("listener stopped", err))
}

fn build_config(args: &ServeArgs) -> CliResult<ServerConfig> {
    let mut config = ServerConfig::new(args.address.as_str())
        .with_gzip(args.gzip)
        .with_append(args.append)
        .with_serialize(args.mutex)
        .with_udp_read_buffer_size(parse_byte_size(&args.bufsize)?);
    if let Some(file) = &args.file {
        config = config.with_output_pattern(file.as_str());
    }
    if args.chunk {
        config = config.with_frame_mode(FrameMode::Chunk);
    }
    if args.udp {
        config = config.with_transport(TransportKind::Udp);
    }
    Ok(config)
}

fn parse_byte_size(input: &str) -> CliResult<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "size must not be empty"));
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let value: usize = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid size value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "size must be greater than zero"));
    }

    let multiplier: usize = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" | "KIB" => 1 << 10,
        "M" | "MB" | "MIB" => 1 << 20,
        "G" | "GB" | "GIB" => 1 << 30,
        _ => {
            return Err(CliError::new(
                USAGE,
                format!("unsupported size unit: {}", unit.trim()),
            ))
        }
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| CliError::new(USAGE, format!("size too large: {input}")))
}
