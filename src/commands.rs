//! ESP-AT Wi-Fi commands used by the station disconnect flow.

use anyhow::Result;
use std::io::{Read, Write};
use tracing::warn;

use crate::mode::WifiMode;
use crate::transport::{AtPort, ResultCode};

#[cfg(test)]
use mockall::automock;

/// The module operations the controller depends on.
#[cfg_attr(test, automock)]
pub trait AtCommands {
    /// Current operating mode. A module that rejects the query yields
    /// [`WifiMode::Failure`]; only transport problems are errors.
    fn wifi_get_mode(&mut self) -> Result<WifiMode>;

    /// Disconnects from the current access point and returns the module's
    /// result code untouched.
    fn wifi_disconnect_ap(&mut self) -> Result<ResultCode>;
}

/// [`AtCommands`] over a live AT channel.
pub struct AtClient<T> {
    port: AtPort<T>,
}

impl<T: Read + Write> AtClient<T> {
    pub fn new(port: AtPort<T>) -> Self {
        AtClient { port }
    }
}

impl<T: Read + Write> AtCommands for AtClient<T> {
    fn wifi_get_mode(&mut self) -> Result<WifiMode> {
        let response = self.port.exchange("AT+CWMODE?")?;

        if response.code != ResultCode::Ok {
            warn!(code = %response.code, "module rejected mode query");
            return Ok(WifiMode::Failure);
        }

        match response.field("+CWMODE:") {
            Some(raw) => Ok(WifiMode::parse(raw)),
            None => {
                warn!(lines = ?response.lines, "mode query returned no +CWMODE line");
                Ok(WifiMode::Failure)
            }
        }
    }

    fn wifi_disconnect_ap(&mut self) -> Result<ResultCode> {
        Ok(self.port.exchange("AT+CWQAP")?.code)
    }
}
