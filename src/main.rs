use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use station_disconnect::{config::Config, controller, transport, AtClient, AtCommands};

#[derive(Parser, Debug)]
#[command(name = "station-disconnect")]
#[command(
    about = "Disconnect an ESP-AT module from its AP when it is in station mode",
    long_about = "Queries the module's Wi-Fi mode with AT+CWMODE? and, if it is in \
                  station mode, disconnects it from the access point with AT+CWQAP.\n\n\
                  The serial device is read from the config file \
                  (<config dir>/station-disconnect/config.toml)."
)]
#[command(version)]
struct Cli {
    /// Accepted and ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

fn init_logging() {
    // RUST_LOG overrides; stay quiet otherwise so stdout is just the status lines
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    init_logging();

    let cfg = Config::load()?;
    let mut at = AtClient::new(transport::open(&cfg)?);

    let stdout = io::stdout();
    execute(&mut at, &mut stdout.lock())
}

/// Every branch, `failure` included, ends the process successfully.
fn execute<A: AtCommands, W: Write>(at: &mut A, out: &mut W) -> Result<()> {
    controller::run(at, out)?;
    Ok(())
}
