//! Wi-Fi operating mode as reported by `AT+CWMODE?`.

use std::fmt;

/// The module's operating mode, or the reason it could not be read.
///
/// Parsing never fails: values outside `0..=3` are kept verbatim in
/// [`WifiMode::Other`] so they can be echoed back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiMode {
    /// `0`: Wi-Fi RF disabled.
    Null,
    /// `1`: connects to an access point as a client.
    Station,
    /// `2`: the module is the access point.
    SoftAp,
    /// `3`: both at once.
    SoftApStation,
    /// The query itself failed.
    Failure,
    Other(String),
}

impl WifiMode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "0" => WifiMode::Null,
            "1" => WifiMode::Station,
            "2" => WifiMode::SoftAp,
            "3" => WifiMode::SoftApStation,
            "failure" => WifiMode::Failure,
            other => WifiMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WifiMode::Null => "0",
            WifiMode::Station => "1",
            WifiMode::SoftAp => "2",
            WifiMode::SoftApStation => "3",
            WifiMode::Failure => "failure",
            WifiMode::Other(raw) => raw,
        }
    }
}

impl fmt::Display for WifiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
