use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flexi_logger::{Duplicate, Logger};
use log::error;

use ircrelay::{reactor, Config, RelayError};

/// A single-process chat relay server implementing a subset of the IRC wire
/// protocol.
#[derive(Parser, Debug)]
#[command(name = "ircrelay", version, about)]
struct Args {
    /// TCP port to listen on.
    port: u16,

    /// Shared password required of every connecting client.
    password: String,

    /// Optional TOML configuration file (server name, log level, backlog).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    Logger::try_with_str(&config.log_level)
        .and_then(|logger| logger.log_to_stderr().duplicate_to_stderr(Duplicate::All).start())
        .ok();

    if let Err(e) = run(args.port, &args.password, &config) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(port: u16, password: &str, config: &Config) -> Result<(), RelayError> {
    if port == 0 {
        return Err(RelayError::InvalidPort(port.to_string()));
    }
    reactor::start(port, password, config)
}
