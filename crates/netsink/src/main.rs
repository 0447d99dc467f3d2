mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::ServeArgs;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "netsink",
    version,
    about = "Listen on TCP or UDP and write what senders send to stdout or files"
)]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr). Defaults to info with --verbose, error otherwise.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(flatten)]
    serve: ServeArgs,
}

fn main() {
    let cli = Cli::parse();
    init_logging(
        cli.log_format,
        LogLevel::effective(cli.log_level, cli.serve.verbose),
    );

    match cmd::run(cli.serve) {
        Ok(never) => match never {},
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
