use std::convert::Infallible;

use clap::Args;

use crate::exit::CliResult;

pub mod serve;

/// Listener options, mirroring the configuration the server accepts.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listening address.
    #[arg(value_name = "[HOST]:PORT")]
    pub address: String,

    /// Output file name; supports templates, e.g. 'out-{{.Id}}-{{.Ip}}-{{.Port}}'.
    /// Writes to stdout when omitted.
    ///
    /// Only the field actions {{.Id}}, {{.Ip}} and {{.Port}} are supported,
    /// optionally with {{- and -}} trim markers. Functions and pipelines such
    /// as printf are rejected at startup.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Accept gzipped data (detected per connection or datagram).
    #[arg(short = 'z', long)]
    pub gzip: bool,

    /// Append data to the output file instead of truncating it.
    #[arg(short = 'a', long)]
    pub append: bool,

    /// Handle connections one at a time, in arrival order.
    #[arg(short = 'm', long)]
    pub mutex: bool,

    /// Read data in chunk mode instead of line mode.
    #[arg(short = 'c', long)]
    pub chunk: bool,

    /// Use UDP instead of TCP.
    #[arg(short = 'u', long)]
    pub udp: bool,

    /// Read buffer size for UDP datagrams (e.g. 64KB, 1MiB, 512).
    #[arg(long, value_name = "SIZE", default_value = "64KB")]
    pub bufsize: String,

    /// Log listener and connection activity to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

pub fn run(args: ServeArgs) -> CliResult<Infallible> {
    serve::run(args)
}
