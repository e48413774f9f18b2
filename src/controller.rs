//! Query the module's mode and disconnect it from its AP if it is a station.

use anyhow::Result;
use std::io::Write;
use tracing::info;

use crate::commands::AtCommands;
use crate::mode::WifiMode;

/// Mode legend printed when the module is not in station mode.
pub const MODE_LEGEND: [&str; 4] = [
    "0: null Mode, Wi-Fi RF will be disabled",
    "1: station mode",
    "2: softAP mode",
    "3: softAP+station mode",
];

/// Which branch a run took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Disconnected,
    QueryFailed,
    NotStation(WifiMode),
}

/// Runs the disconnect flow once, writing status lines to `out`.
///
/// Errors from `at` are returned as-is; in particular a failed mode query
/// never reaches the disconnect command.
pub fn run<A, W>(at: &mut A, out: &mut W) -> Result<Outcome>
where
    A: AtCommands + ?Sized,
    W: Write,
{
    let mode = at.wifi_get_mode()?;
    writeln!(out, "{}", mode)?;

    let outcome = match mode {
        WifiMode::Station => {
            let result = at.wifi_disconnect_ap()?;
            writeln!(out, "{}", result)?;
            writeln!(out, "Disconnected from AP")?;
            Outcome::Disconnected
        }
        WifiMode::Failure => {
            writeln!(out, "failure in disconnect")?;
            Outcome::QueryFailed
        }
        other => {
            writeln!(out, "station mode is not selected, current mode is {}", other)?;
            for line in MODE_LEGEND {
                writeln!(out, "{}", line)?;
            }
            Outcome::NotStation(other)
        }
    };

    info!(?outcome, "station disconnect finished");
    Ok(outcome)
}
