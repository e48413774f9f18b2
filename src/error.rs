use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtError {
    #[error("Failed to open serial port '{port}': {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out waiting for a response to '{0}'")]
    Timeout(String),

    #[error("Device closed before '{0}' returned a result code")]
    UnexpectedEof(String),
}
