//! Error types for the maestro library.

use thiserror::Error;

/// The main error type for maestro operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serial port error (port could not be opened or configured).
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error on the open transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Response from the device did not match the protocol.
    #[error("protocol error: {message}")]
    Protocol { message: String },

    /// A write operand does not fit the command's fixed wire width.
    #[error("operand {value} does not fit in {width} digits")]
    OperandOutOfRange { value: u32, width: usize },

    /// Session has not been initialized yet.
    #[error("not connected")]
    NotConnected,

    /// Session has been shut down.
    #[error("session closed")]
    SessionClosed,
}

impl Error {
    /// Builds a protocol error for a malformed or missing response.
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Result type alias for maestro operations.
pub type Result<T> = std::result::Result<T, Error>;
