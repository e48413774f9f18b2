//! Line-level ESP-AT transport.
//!
//! Every exchange is one command line terminated by `\r\n`, followed by any
//! number of information lines from the module and exactly one final result
//! code (`OK`, `ERROR` or `FAIL`).
//!
//! ```text
//! > AT+CWMODE?
//! < AT+CWMODE?        (echo, dropped)
//! < +CWMODE:1
//! <
//! < OK
//! ```

use anyhow::Result;
use std::fmt;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::AtError;

/// Final line of an AT exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    Error,
    Fail,
}

impl ResultCode {
    fn from_line(line: &str) -> Option<Self> {
        match line {
            "OK" => Some(ResultCode::Ok),
            "ERROR" => Some(ResultCode::Error),
            "FAIL" => Some(ResultCode::Fail),
            _ => None,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultCode::Ok => "OK",
            ResultCode::Error => "ERROR",
            ResultCode::Fail => "FAIL",
        })
    }
}

/// Information lines plus the result code of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtResponse {
    pub lines: Vec<String>,
    pub code: ResultCode,
}

impl AtResponse {
    /// Value of the first `<prefix><value>` line, e.g. `+CWMODE:` -> `1`.
    pub fn field(&self, prefix: &str) -> Option<&str> {
        self.lines
            .iter()
            .find_map(|line| line.strip_prefix(prefix))
            .map(str::trim)
    }
}

/// A command/response channel to the module.
pub struct AtPort<T> {
    inner: BufReader<T>,
}

impl<T: Read + Write> AtPort<T> {
    pub fn new(stream: T) -> Self {
        AtPort {
            inner: BufReader::new(stream),
        }
    }

    /// Sends `command` and collects the response up to its result code.
    pub fn exchange(&mut self, command: &str) -> Result<AtResponse> {
        debug!(command, "sending AT command");

        let stream = self.inner.get_mut();
        stream
            .write_all(command.as_bytes())
            .and_then(|()| stream.write_all(b"\r\n"))
            .and_then(|()| stream.flush())
            .map_err(|e| io_error(command, e))?;

        let mut lines = Vec::new();
        loop {
            let line = self.read_line(command)?;
            trace!(line = %line, "received");

            if let Some(code) = ResultCode::from_line(&line) {
                debug!(command, %code, "AT command finished");
                return Ok(AtResponse { lines, code });
            }

            if line.is_empty() || line == command || line.starts_with("busy ") {
                continue;
            }
            lines.push(line);
        }
    }

    fn read_line(&mut self, command: &str) -> Result<String> {
        let mut buf = Vec::new();
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => Err(AtError::UnexpectedEof(command.to_string()).into()),
            Ok(_) => Ok(String::from_utf8_lossy(&buf).trim_end().to_string()),
            Err(e) => Err(io_error(command, e).into()),
        }
    }
}

fn io_error(command: &str, e: std::io::Error) -> AtError {
    if e.kind() == ErrorKind::TimedOut {
        AtError::Timeout(command.to_string())
    } else {
        AtError::Io(e)
    }
}

/// Opens the serial device named in `config`.
pub fn open(config: &Config) -> Result<AtPort<Box<dyn serialport::SerialPort>>> {
    debug!(port = %config.port, baud_rate = config.baud_rate, "opening serial port");

    let port = serialport::new(config.port.as_str(), config.baud_rate)
        .timeout(config.timeout())
        .open()
        .map_err(|source| AtError::Open {
            port: config.port.clone(),
            source,
        })?;

    Ok(AtPort::new(port))
}

/// In-memory stand-in for a serial device: replays a canned byte stream and
/// records everything written to it.
#[cfg(test)]
pub(crate) struct FakeDevice {
    pub input: std::io::Cursor<Vec<u8>>,
    pub written: Vec<u8>,
    pub timeout_at_end: bool,
    pub write_error: Option<ErrorKind>,
}

#[cfg(test)]
impl FakeDevice {
    pub fn replying(reply: &str) -> Self {
        FakeDevice {
            input: std::io::Cursor::new(reply.as_bytes().to_vec()),
            written: Vec::new(),
            timeout_at_end: false,
            write_error: None,
        }
    }
}

#[cfg(test)]
impl Read for FakeDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.input.read(buf)?;
        if n == 0 && self.timeout_at_end {
            return Err(std::io::Error::new(ErrorKind::TimedOut, "no data"));
        }
        Ok(n)
    }
}

#[cfg(test)]
impl Write for FakeDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(std::io::Error::new(kind, "write refused"));
        }
        self.written.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exchange_writes_crlf_terminated_command() {
        let mut port = AtPort::new(FakeDevice::replying("OK\r\n"));
        port.exchange("AT+CWQAP").unwrap();
        assert_eq!(port.inner.get_ref().written, b"AT+CWQAP\r\n");
    }

    #[test]
    fn exchange_drops_echo_blank_and_busy_lines() {
        let reply = "AT+CWMODE?\r\nbusy p...\r\n+CWMODE:3\r\n\r\nOK\r\n";
        let mut port = AtPort::new(FakeDevice::replying(reply));

        let response = port.exchange("AT+CWMODE?").unwrap();
        assert_eq!(
            response,
            AtResponse {
                lines: vec!["+CWMODE:3".to_string()],
                code: ResultCode::Ok,
            }
        );
        assert_eq!(response.field("+CWMODE:"), Some("3"));
    }

    #[test]
    fn exchange_stops_at_error_and_fail() {
        let mut port = AtPort::new(FakeDevice::replying("ERROR\r\nFAIL\r\n"));
        assert_eq!(port.exchange("AT+CWQAP").unwrap().code, ResultCode::Error);
        assert_eq!(port.exchange("AT+CWQAP").unwrap().code, ResultCode::Fail);
    }

    #[test]
    fn eof_before_result_code_is_an_error() {
        let mut port = AtPort::new(FakeDevice::replying("+CWMODE:1\r\n"));
        let err = port.exchange("AT+CWMODE?").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AtError>(),
            Some(AtError::UnexpectedEof(cmd)) if cmd == "AT+CWMODE?"
        ));
    }

    #[test]
    fn read_timeout_is_reported_as_timeout() {
        let mut device = FakeDevice::replying("");
        device.timeout_at_end = true;
        let mut port = AtPort::new(device);

        let err = port.exchange("AT+CWMODE?").unwrap_err();
        assert!(matches!(err.downcast_ref::<AtError>(), Some(AtError::Timeout(_))));
    }

    #[test]
    fn write_failures_are_domain_errors() {
        let mut device = FakeDevice::replying("OK\r\n");
        device.write_error = Some(ErrorKind::TimedOut);
        let err = AtPort::new(device).exchange("AT+CWQAP").unwrap_err();
        assert!(matches!(err.downcast_ref::<AtError>(), Some(AtError::Timeout(cmd)) if cmd == "AT+CWQAP"));

        let mut device = FakeDevice::replying("OK\r\n");
        device.write_error = Some(ErrorKind::BrokenPipe);
        let err = AtPort::new(device).exchange("AT+CWQAP").unwrap_err();
        assert!(matches!(err.downcast_ref::<AtError>(), Some(AtError::Io(_))));
    }

    #[test]
    fn result_code_displays_as_wire_literal() {
        assert_eq!(ResultCode::Ok.to_string(), "OK");
        assert_eq!(ResultCode::Error.to_string(), "ERROR");
        assert_eq!(ResultCode::Fail.to_string(), "FAIL");
    }
}
