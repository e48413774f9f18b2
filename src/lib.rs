//! Station disconnect for ESP-AT Wi-Fi modules
//!
//! This library talks to an ESP module running the ESP-AT firmware over a
//! serial line. It reads the module's Wi-Fi operating mode and, when the
//! module is a station, tells it to leave its access point.
//!
//! # Modules
//!
//! - [`commands`] - The `AtCommands` capability and its serial implementation
//! - [`config`] - Serial device settings loaded from a TOML file
//! - [`controller`] - The query-then-disconnect flow and its console output
//! - [`error`] - Custom error types for the library
//! - [`mode`] - Wi-Fi operating mode values
//! - [`transport`] - Line-level AT command/response exchange
//!
//! # Example Usage
//!
//! ```no_run
//! use station_disconnect::{config::Config, controller, transport, AtClient};
//!
//! let cfg = Config::load().expect("Bad config");
//! let mut at = AtClient::new(transport::open(&cfg).expect("Serial port unavailable"));
//!
//! controller::run(&mut at, &mut std::io::stdout()).expect("AT exchange failed");
//! ```

/// AT command capability consumed by the controller.
/// `AtClient` implements it on top of a [`transport::AtPort`].
pub mod commands;

/// Configuration module for the serial device settings.
/// Handles reading the TOML config file from the user's config directory.
pub mod config;

/// Controller module running the station disconnect flow once.
pub mod controller;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Mode module holding the Wi-Fi operating mode reported by the module.
pub mod mode;

/// Transport module for the ESP-AT line protocol over a serial port.
pub mod transport;

pub use commands::{AtClient, AtCommands};
pub use controller::{run, Outcome};
pub use error::AtError;
pub use mode::WifiMode;
pub use transport::{AtPort, AtResponse, ResultCode};
